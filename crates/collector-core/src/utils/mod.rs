//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Utility functions and helper modules for the telemetry collector
//!
//! Clock and jitter helpers plus the retry policy used by exporters that
//! talk to fallible backends.

pub mod retry;
pub mod time;

// Re-export commonly used types
pub use retry::{RetryConfig, RetryPolicy, RetryStats};
pub use time::{now_nanos, random_duration, TimeUtils};
