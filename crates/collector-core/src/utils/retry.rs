//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Backoff for exporters talking to flaky backends
//!
//! The pipeline never retries a failed flush itself. Exporters that want
//! retries wrap their backend call in a [`RetryPolicy`].

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::CollectorResult;

/// Backoff settings; delays are in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts including the first one
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
    /// Relative spread applied to each delay, clamped to `0.0..=1.0`
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 5_000,
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryConfig {
    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let steps = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let ceiling = self.max_backoff_ms.max(1) as f64;
        let base = (self.initial_backoff_ms as f64 * self.multiplier.max(1.0).powi(steps)).min(ceiling);

        let spread = self.jitter.clamp(0.0, 1.0);
        let factor = 1.0 + spread * (rand::random::<f64>() * 2.0 - 1.0);
        Duration::from_millis((base * factor).clamp(1.0, ceiling) as u64)
    }
}

/// Outcome counters of one policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryStats {
    /// Individual retries performed
    pub retries: u64,
    /// Operations that failed at least once and then succeeded
    pub recovered: u64,
    /// Operations returned as errors
    pub exhausted: u64,
}

#[derive(Debug, Default)]
struct Counters {
    retries: AtomicU64,
    recovered: AtomicU64,
    exhausted: AtomicU64,
}

/// Exponential backoff with jitter.
///
/// Errors for which [`CollectorError::is_retryable`] is false end the
/// operation on the first failure.
///
/// [`CollectorError::is_retryable`]: crate::error::CollectorError::is_retryable
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
    counters: Arc<Counters>,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            counters: Arc::default(),
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Run `operation` until it succeeds, fails permanently or runs out of
    /// attempts. `target` names the caller in log events.
    pub async fn execute<F, Fut, T>(&self, target: &str, operation: F) -> CollectorResult<T>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = CollectorResult<T>> + Send,
    {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        self.counters.recovered.fetch_add(1, Ordering::Relaxed);
                        debug!(target_name = target, attempt, "Recovered after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                self.counters.exhausted.fetch_add(1, Ordering::Relaxed);
                warn!(target_name = target, attempt, error = %err, "Giving up");
                return Err(err);
            }

            let delay = self.config.backoff(attempt);
            debug!(target_name = target, attempt, ?delay, error = %err, "Retrying");
            self.counters.retries.fetch_add(1, Ordering::Relaxed);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    pub fn stats(&self) -> RetryStats {
        RetryStats {
            retries: self.counters.retries.load(Ordering::Relaxed),
            recovered: self.counters.recovered.load(Ordering::Relaxed),
            exhausted: self.counters.exhausted.load(Ordering::Relaxed),
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        Self::new(config)
    }
}
