//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Bounded, kind-homogeneous accumulation buffer
//!
//! Each exporter owns one [`Buffer`] fixed to the pipeline's [`DataType`].
//! Items are appended in arrival order and drained all at once by a flush,
//! which swaps in fresh storage with the same capacity.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::error::{CollectorError, CollectorResult};
use crate::types::{DataType, Log, Metric, ObservableData, Raw, Span, TelemetryItem};

/// A drained batch, typed by kind
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    Metrics(Vec<Metric>),
    Logs(Vec<Log>),
    Spans(Vec<Span>),
    Raws(Vec<Raw>),
}

impl Batch {
    /// Empty batch of `data_type` with room for `capacity` items
    pub fn with_capacity(data_type: DataType, capacity: usize) -> Self {
        match data_type {
            DataType::Metric => Batch::Metrics(Vec::with_capacity(capacity)),
            DataType::Log => Batch::Logs(Vec::with_capacity(capacity)),
            DataType::Span => Batch::Spans(Vec::with_capacity(capacity)),
            DataType::Raw => Batch::Raws(Vec::with_capacity(capacity)),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Batch::Metrics(_) => DataType::Metric,
            Batch::Logs(_) => DataType::Log,
            Batch::Spans(_) => DataType::Span,
            Batch::Raws(_) => DataType::Raw,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Batch::Metrics(v) => v.len(),
            Batch::Logs(v) => v.len(),
            Batch::Spans(v) => v.len(),
            Batch::Raws(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item counts grouped by owning organisation
    pub fn count_by_org(&self) -> HashMap<String, u64> {
        fn count<T: ObservableData>(items: &[T]) -> HashMap<String, u64> {
            let mut counts = HashMap::new();
            for item in items {
                *counts.entry(item.org_name().to_string()).or_insert(0) += 1;
            }
            counts
        }

        match self {
            Batch::Metrics(v) => count(v),
            Batch::Logs(v) => count(v),
            Batch::Spans(v) => count(v),
            Batch::Raws(v) => count(v),
        }
    }

    /// Re-wrap every item into the tagged union, preserving order
    pub fn into_items(self) -> Vec<TelemetryItem> {
        match self {
            Batch::Metrics(v) => v.into_iter().map(TelemetryItem::Metric).collect(),
            Batch::Logs(v) => v.into_iter().map(TelemetryItem::Log).collect(),
            Batch::Spans(v) => v.into_iter().map(TelemetryItem::Span).collect(),
            Batch::Raws(v) => v.into_iter().map(TelemetryItem::Raw).collect(),
        }
    }

    fn push(&mut self, item: TelemetryItem) -> CollectorResult<()> {
        match (self, item) {
            (Batch::Metrics(v), TelemetryItem::Metric(m)) => v.push(m),
            (Batch::Logs(v), TelemetryItem::Log(l)) => v.push(l),
            (Batch::Spans(v), TelemetryItem::Span(s)) => v.push(s),
            (Batch::Raws(v), TelemetryItem::Raw(r)) => v.push(r),
            (batch, item) => {
                return Err(CollectorError::kind_mismatch(
                    batch.data_type(),
                    item.data_type(),
                ))
            }
        }
        Ok(())
    }
}

/// Mutex-guarded buffer with a fixed capacity.
///
/// The buffer never blocks. Callers check [`Buffer::full`] and flush before
/// pushing; pushing into a full buffer is rejected with an error.
#[derive(Debug)]
pub struct Buffer {
    data_type: DataType,
    capacity: usize,
    inner: Mutex<Batch>,
}

impl Buffer {
    /// Create a buffer; a zero capacity is raised to one
    pub fn new(data_type: DataType, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data_type,
            capacity,
            inner: Mutex::new(Batch::with_capacity(data_type, capacity)),
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Append `item`, returning whether the buffer is now full
    pub fn push(&self, item: TelemetryItem) -> CollectorResult<bool> {
        let mut batch = self.inner.lock();
        if batch.len() >= self.capacity {
            return Err(CollectorError::internal(format!(
                "push into full {} buffer (capacity {})",
                self.data_type, self.capacity
            )));
        }
        batch.push(item)?;
        Ok(batch.len() >= self.capacity)
    }

    /// Swap out the contents for a fresh batch of the same capacity
    pub fn flush_all(&self) -> Batch {
        let fresh = Batch::with_capacity(self.data_type, self.capacity);
        std::mem::replace(&mut *self.inner.lock(), fresh)
    }

    pub fn flush_all_metrics(&self) -> CollectorResult<Vec<Metric>> {
        match self.flush_kind(DataType::Metric)? {
            Batch::Metrics(v) => Ok(v),
            other => Err(CollectorError::kind_mismatch(DataType::Metric, other.data_type())),
        }
    }

    pub fn flush_all_logs(&self) -> CollectorResult<Vec<Log>> {
        match self.flush_kind(DataType::Log)? {
            Batch::Logs(v) => Ok(v),
            other => Err(CollectorError::kind_mismatch(DataType::Log, other.data_type())),
        }
    }

    pub fn flush_all_spans(&self) -> CollectorResult<Vec<Span>> {
        match self.flush_kind(DataType::Span)? {
            Batch::Spans(v) => Ok(v),
            other => Err(CollectorError::kind_mismatch(DataType::Span, other.data_type())),
        }
    }

    pub fn flush_all_raws(&self) -> CollectorResult<Vec<Raw>> {
        match self.flush_kind(DataType::Raw)? {
            Batch::Raws(v) => Ok(v),
            other => Err(CollectorError::kind_mismatch(DataType::Raw, other.data_type())),
        }
    }

    // checked before draining so a wrong-kind flush leaves the contents intact
    fn flush_kind(&self, expected: DataType) -> CollectorResult<Batch> {
        if self.data_type != expected {
            return Err(CollectorError::kind_mismatch(expected, self.data_type));
        }
        Ok(self.flush_all())
    }
}
