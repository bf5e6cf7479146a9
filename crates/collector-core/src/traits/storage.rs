//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Storage contracts for backends that persist telemetry
//!
//! The collector never persists data itself; storage engines implement
//! these traits and are driven by a storage-backed exporter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CollectorResult;
use crate::types::{DataType, TelemetryItem};

/// Query over stored items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    /// Kind of items to return
    pub data_type: DataType,

    /// Inclusive lower bound in nanoseconds
    pub start: i64,

    /// Exclusive upper bound in nanoseconds
    pub end: i64,

    /// Restrict to items with this name, where the kind has one
    #[serde(default)]
    pub name: Option<String>,
}

impl Selector {
    pub fn new(data_type: DataType, start: i64, end: i64) -> Self {
        Self {
            data_type,
            start,
            end,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Storage backend
#[async_trait]
pub trait Storage: Send + Sync {
    /// Open a writer
    async fn writer(&self) -> CollectorResult<Box<dyn Writer>>;

    /// Iterate over items matching `selector`
    async fn iterator(&self, selector: &Selector) -> CollectorResult<Box<dyn StorageIterator>>;
}

/// Write handle
#[async_trait]
pub trait Writer: Send {
    /// Write a batch, returning how many items were stored
    async fn write_n(&mut self, items: Vec<TelemetryItem>) -> CollectorResult<usize>;

    /// Flush and release the handle
    async fn close(&mut self) -> CollectorResult<()>;
}

/// Read cursor
#[async_trait]
pub trait StorageIterator: Send {
    async fn next(&mut self) -> CollectorResult<Option<TelemetryItem>>;
}
