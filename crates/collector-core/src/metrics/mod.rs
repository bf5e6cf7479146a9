//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Metrics collection for the telemetry collector
//!
//! Stage counters are recorded through an explicitly constructed
//! [`PipelineMetrics`] handed to every pipeline.

pub mod collector;
pub mod config;

// Re-export commonly used types
pub use collector::{CounterKey, PipelineMetrics};
pub use config::MetricsConfig;
