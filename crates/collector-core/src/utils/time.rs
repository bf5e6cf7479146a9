//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Time utilities for the telemetry collector
//!
//! Item timestamps are nanoseconds since the Unix epoch held in `i64`.

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use std::time::Duration;

use crate::error::{CollectorError, CollectorResult};

/// `interval` plus a uniformly random share of `jitter`
pub fn random_duration(interval: Duration, jitter: Duration) -> Duration {
    let jitter_nanos = u64::try_from(jitter.as_nanos()).unwrap_or(u64::MAX);
    if jitter_nanos == 0 {
        return interval;
    }
    let extra = rand::thread_rng().gen_range(0..=jitter_nanos);
    interval.saturating_add(Duration::from_nanos(extra))
}

/// Current time in Unix nanoseconds
pub fn now_nanos() -> i64 {
    TimeUtils::to_unix_nanos(&Utc::now())
}

/// Conversions between item timestamps and `chrono` values
pub struct TimeUtils;

impl TimeUtils {
    /// Unix nanoseconds for `datetime`, saturating outside the `i64` range
    pub fn to_unix_nanos(datetime: &DateTime<Utc>) -> i64 {
        datetime
            .timestamp_nanos_opt()
            .unwrap_or(if datetime.timestamp() < 0 { i64::MIN } else { i64::MAX })
    }

    /// `DateTime` for a nanosecond timestamp
    pub fn from_unix_nanos(nanos: i64) -> DateTime<Utc> {
        Utc.timestamp_nanos(nanos)
    }

    /// Validate a half-open `[start, end)` range; an empty range is allowed
    pub fn validate_range(start: i64, end: i64) -> CollectorResult<()> {
        if end < start {
            return Err(CollectorError::validation(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        Ok(())
    }
}
