//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Processor contract
//!
//! One method per telemetry kind. `Ok(Some(item))` forwards a (possibly
//! replaced) item, `Ok(None)` drops it, and an error leaves the item as it
//! was before this processor ran. Kinds a processor does not override pass
//! through untouched.

use async_trait::async_trait;

use super::ComponentConfig;
use crate::error::CollectorResult;
use crate::types::{Log, Metric, Raw, Span};

/// Telemetry processor trait for transforming items in flight
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process_metric(&self, item: Metric) -> CollectorResult<Option<Metric>> {
        Ok(Some(item))
    }

    async fn process_log(&self, item: Log) -> CollectorResult<Option<Log>> {
        Ok(Some(item))
    }

    async fn process_span(&self, item: Span) -> CollectorResult<Option<Span>> {
        Ok(Some(item))
    }

    async fn process_raw(&self, item: Raw) -> CollectorResult<Option<Raw>> {
        Ok(Some(item))
    }

    /// Configuration used by the wiring layer
    fn component_config(&self) -> ComponentConfig {
        ComponentConfig::default()
    }

    /// Release processor resources
    async fn close(&self) -> CollectorResult<()> {
        Ok(())
    }
}
