//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Console exporter
//!
//! Writes every exported item as one JSON line through `tracing` under the
//! `collector::console` target. Useful for local runs and debugging filters.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use crate::error::{CollectorError, CollectorResult};
use crate::filter::FilterConfig;
use crate::traits::{ComponentConfig, Exporter};
use crate::types::{DataType, Log, Metric, ObservableData, Raw, Span};

#[derive(Debug, Default)]
pub struct ConsoleExporter {
    filter: FilterConfig,
    exported: AtomicU64,
}

impl ConsoleExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Items written since creation
    pub fn exported(&self) -> u64 {
        self.exported.load(Ordering::Relaxed)
    }

    fn emit<T>(&self, items: &[T]) -> CollectorResult<()>
    where
        T: Serialize + ObservableData,
    {
        for item in items {
            let line = serde_json::to_string(item).map_err(|e| {
                CollectorError::serialization_with_source("Failed to encode item", e)
            })?;
            info!(
                target: "collector::console",
                kind = %item.data_type(),
                org = item.org_name(),
                "{}",
                line
            );
            self.exported.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

#[async_trait]
impl Exporter for ConsoleExporter {
    fn supports(&self, _data_type: DataType) -> bool {
        true
    }

    async fn export_metric(&self, items: Vec<Metric>) -> CollectorResult<()> {
        self.emit(&items)
    }

    async fn export_log(&self, items: Vec<Log>) -> CollectorResult<()> {
        self.emit(&items)
    }

    async fn export_span(&self, items: Vec<Span>) -> CollectorResult<()> {
        self.emit(&items)
    }

    async fn export_raw(&self, items: Vec<Raw>) -> CollectorResult<()> {
        self.emit(&items)
    }

    fn component_config(&self) -> ComponentConfig {
        ComponentConfig::with_filter(self.filter.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_kind_exported() {
        let exporter = ConsoleExporter::new();
        for kind in DataType::ALL {
            assert!(exporter.supports(kind));
        }

        exporter
            .export_metric(vec![Metric::new("cpu"), Metric::new("mem")])
            .await
            .unwrap();
        exporter.export_log(vec![Log::new("line")]).await.unwrap();
        exporter.export_span(vec![Span::new("t", "s")]).await.unwrap();
        exporter.export_raw(vec![Raw::new("{}")]).await.unwrap();
        assert_eq!(exporter.exported(), 5);
    }
}
