//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Metrics configuration for the telemetry collector

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable metrics collection
    pub enabled: bool,

    /// Listen address for the Prometheus scrape endpoint, if one is exposed
    #[validate(length(min = 1))]
    pub prometheus_endpoint: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prometheus_endpoint: None,
        }
    }
}
