//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! In-memory storage backend

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CollectorError, CollectorResult};
use crate::traits::{Selector, Storage, StorageIterator, Writer};
use crate::types::{ObservableData, TelemetryItem};
use crate::utils::TimeUtils;

/// Items kept in insertion order behind a shared lock.
///
/// Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<Vec<TelemetryItem>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Copy of everything stored so far
    pub async fn snapshot(&self) -> Vec<TelemetryItem> {
        self.items.read().await.clone()
    }
}

/// Name used by [`Selector::name`]; logs have none
fn item_name(item: &TelemetryItem) -> Option<String> {
    match item {
        TelemetryItem::Metric(m) => Some(m.name.clone()),
        TelemetryItem::Span(s) => Some(s.name.clone()),
        TelemetryItem::Raw(r) => Some(r.get_name()),
        TelemetryItem::Log(_) => None,
    }
}

fn selects(selector: &Selector, item: &TelemetryItem) -> bool {
    if item.data_type() != selector.data_type {
        return false;
    }
    // kinds without a timestamp are not bounded by the range
    if let Some(ts) = item.timestamp() {
        if ts < selector.start || ts >= selector.end {
            return false;
        }
    }
    match &selector.name {
        Some(name) => item_name(item).as_deref() == Some(name.as_str()),
        None => true,
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn writer(&self) -> CollectorResult<Box<dyn Writer>> {
        Ok(Box::new(MemoryWriter {
            items: Arc::clone(&self.items),
            closed: false,
        }))
    }

    async fn iterator(&self, selector: &Selector) -> CollectorResult<Box<dyn StorageIterator>> {
        TimeUtils::validate_range(selector.start, selector.end)?;
        let items: VecDeque<TelemetryItem> = self
            .items
            .read()
            .await
            .iter()
            .filter(|item| selects(selector, item))
            .cloned()
            .collect();
        debug!(kind = %selector.data_type, matched = items.len(), "Opened memory iterator");
        Ok(Box::new(MemoryIterator { items }))
    }
}

struct MemoryWriter {
    items: Arc<RwLock<Vec<TelemetryItem>>>,
    closed: bool,
}

#[async_trait]
impl Writer for MemoryWriter {
    async fn write_n(&mut self, items: Vec<TelemetryItem>) -> CollectorResult<usize> {
        if self.closed {
            return Err(CollectorError::storage("write on closed writer"));
        }
        let count = items.len();
        self.items.write().await.extend(items);
        Ok(count)
    }

    async fn close(&mut self) -> CollectorResult<()> {
        self.closed = true;
        Ok(())
    }
}

struct MemoryIterator {
    items: VecDeque<TelemetryItem>,
}

#[async_trait]
impl StorageIterator for MemoryIterator {
    async fn next(&mut self) -> CollectorResult<Option<TelemetryItem>> {
        Ok(self.items.pop_front())
    }
}
