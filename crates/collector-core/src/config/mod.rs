//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Configuration management for the telemetry collector
//!
//! The top-level [`CollectorConfig`] is loaded from a file layered with
//! environment variables, then validated before any pipeline is built.

pub mod collector;
pub mod logging;

// Re-export commonly used types
pub use collector::{CollectorConfig, ComponentSettings, DEFAULT_CONFIG_PATH, ENV_PREFIX};
pub use logging::{LogFormat, LoggingConfig};
