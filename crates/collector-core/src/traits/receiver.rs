//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Receiver contract
//!
//! A receiver ingests telemetry on its own schedule and pushes every item
//! into each registered [`Consumer`]. Decoding of wire protocols happens
//! entirely inside the receiver.

use async_trait::async_trait;

use super::{ComponentConfig, Consumer};
use crate::error::CollectorResult;

/// Telemetry receiver trait for producing items into pipelines
#[async_trait]
pub trait Receiver: Send + Sync {
    /// Register a pipeline consumer; called once per pipeline the receiver feeds
    fn register_consumer(&self, consumer: Consumer);

    /// Configuration used by the wiring layer
    fn component_config(&self) -> ComponentConfig {
        ComponentConfig::default()
    }

    /// Stop producing items
    async fn close(&self) -> CollectorResult<()> {
        Ok(())
    }
}
