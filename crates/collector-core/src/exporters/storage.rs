//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Exporter writing flushed batches into a [`Storage`] backend

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{CollectorError, CollectorResult};
use crate::filter::FilterConfig;
use crate::traits::{ComponentConfig, Exporter, Storage};
use crate::types::{DataType, Log, Metric, Raw, Span, TelemetryItem};
use crate::utils::{RetryConfig, RetryPolicy, RetryStats};

/// Writes each batch through a fresh [`Storage::writer`], retrying
/// retryable failures with exponential backoff.
pub struct StorageExporter<S: Storage> {
    storage: Arc<S>,
    retry: RetryPolicy,
    filter: FilterConfig,
}

impl<S: Storage + 'static> StorageExporter<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            retry: RetryPolicy::default(),
            filter: FilterConfig::default(),
        }
    }

    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = RetryPolicy::new(config);
        self
    }

    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn retry_stats(&self) -> RetryStats {
        self.retry.stats()
    }

    async fn write_batch(&self, items: Vec<TelemetryItem>) -> CollectorResult<()> {
        let expected = items.len();
        let storage = &self.storage;
        let items = &items;

        let written = self
            .retry
            .execute("storage_exporter", || async move {
                let mut writer = storage.writer().await?;
                let written = writer.write_n(items.clone()).await;
                let closed = writer.close().await;
                let written = written?;
                closed?;
                Ok::<usize, CollectorError>(written)
            })
            .await?;

        if written < expected {
            warn!(written, expected, "Storage accepted a partial batch");
        } else {
            debug!(written, "Batch stored");
        }
        Ok(())
    }
}

#[async_trait]
impl<S: Storage + 'static> Exporter for StorageExporter<S> {
    fn supports(&self, _data_type: DataType) -> bool {
        true
    }

    async fn export_metric(&self, items: Vec<Metric>) -> CollectorResult<()> {
        self.write_batch(items.into_iter().map(TelemetryItem::Metric).collect())
            .await
    }

    async fn export_log(&self, items: Vec<Log>) -> CollectorResult<()> {
        self.write_batch(items.into_iter().map(TelemetryItem::Log).collect())
            .await
    }

    async fn export_span(&self, items: Vec<Span>) -> CollectorResult<()> {
        self.write_batch(items.into_iter().map(TelemetryItem::Span).collect())
            .await
    }

    async fn export_raw(&self, items: Vec<Raw>) -> CollectorResult<()> {
        self.write_batch(items.into_iter().map(TelemetryItem::Raw).collect())
            .await
    }

    fn component_config(&self) -> ComponentConfig {
        ComponentConfig::with_filter(self.filter.clone())
    }
}
