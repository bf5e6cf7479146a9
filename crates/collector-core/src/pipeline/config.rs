//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Pipeline configuration for the telemetry collector

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

use crate::error::{CollectorError, CollectorResult};
use crate::types::DataType;

/// Telemetry pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pipeline name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// The one kind of telemetry this pipeline carries
    pub data_type: DataType,

    /// Receiver component names
    pub receivers: Vec<String>,

    /// Processor component names, applied in order
    pub processors: Vec<String>,

    /// Exporter component names
    pub exporters: Vec<String>,

    /// Items per exporter batch
    #[validate(range(min = 1, max = 100000))]
    pub batch_size: usize,

    /// Flush interval in milliseconds
    #[validate(range(min = 1))]
    pub flush_interval_ms: u64,

    /// Upper bound of the random delay added to each flush interval
    pub flush_jitter_ms: u64,

    /// Disabled pipelines are skipped when building
    pub enable: bool,

    /// Capacity of the receiver to processor channel
    #[validate(range(min = 1))]
    pub rp_channel_cap: usize,

    /// Capacity of the processor to exporter channel
    #[validate(range(min = 1))]
    pub pe_channel_cap: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "default-pipeline".to_string(),
            data_type: DataType::Metric,
            receivers: Vec::new(),
            processors: Vec::new(),
            exporters: Vec::new(),
            batch_size: 10,
            flush_interval_ms: 1000,
            flush_jitter_ms: 1000,
            enable: true,
            rp_channel_cap: 64,
            pe_channel_cap: 64,
        }
    }
}

impl PipelineConfig {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Default::default()
        }
    }

    pub fn with_receiver(mut self, name: impl Into<String>) -> Self {
        self.receivers.push(name.into());
        self
    }

    pub fn with_processor(mut self, name: impl Into<String>) -> Self {
        self.processors.push(name.into());
        self
    }

    pub fn with_exporter(mut self, name: impl Into<String>) -> Self {
        self.exporters.push(name.into());
        self
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    pub fn flush_jitter(&self) -> Duration {
        Duration::from_millis(self.flush_jitter_ms)
    }

    /// Validate the configuration
    pub fn validate_config(&self) -> CollectorResult<()> {
        self.validate().map_err(|e| {
            CollectorError::validation_with_source(
                format!("Pipeline {} validation failed", self.name),
                e,
            )
        })
    }
}
