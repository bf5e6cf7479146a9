//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Exporter contract
//!
//! Exporters receive whole batches of one kind. Retry and backoff, when
//! wanted, live inside the exporter; the pipeline logs a failed batch and
//! moves on.

use async_trait::async_trait;

use super::ComponentConfig;
use crate::error::{CollectorError, CollectorResult};
use crate::types::{DataType, Log, Metric, Raw, Span};

/// Telemetry exporter trait for delivering batches to a backend
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Called once before the pipeline starts accepting data
    async fn connect(&self) -> CollectorResult<()> {
        Ok(())
    }

    /// Kinds this exporter accepts. Checked when a pipeline is built, so it
    /// must agree with the `export_*` methods the exporter overrides.
    fn supports(&self, data_type: DataType) -> bool;

    async fn export_metric(&self, _items: Vec<Metric>) -> CollectorResult<()> {
        Err(CollectorError::unsupported("exporter does not handle metrics"))
    }

    async fn export_log(&self, _items: Vec<Log>) -> CollectorResult<()> {
        Err(CollectorError::unsupported("exporter does not handle logs"))
    }

    async fn export_span(&self, _items: Vec<Span>) -> CollectorResult<()> {
        Err(CollectorError::unsupported("exporter does not handle spans"))
    }

    async fn export_raw(&self, _items: Vec<Raw>) -> CollectorResult<()> {
        Err(CollectorError::unsupported("exporter does not handle raw payloads"))
    }

    /// Configuration used by the wiring layer
    fn component_config(&self) -> ComponentConfig {
        ComponentConfig::default()
    }

    /// Release backend connections
    async fn close(&self) -> CollectorResult<()> {
        Ok(())
    }
}
