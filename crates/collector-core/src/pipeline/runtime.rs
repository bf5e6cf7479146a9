//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Runtime wrappers binding a named component to its filter
//!
//! Exporters additionally own a [`Buffer`] and a jittered flush timer. A
//! batch is flushed when the buffer fills or the timer fires, whichever
//! comes first; a size flush re-arms the timer. On shutdown the remaining
//! contents are flushed once more before the timer loop exits.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::PipelineConfig;
use crate::buffer::{Batch, Buffer};
use crate::error::{CollectorError, CollectorResult};
use crate::filter::DataFilter;
use crate::metrics::PipelineMetrics;
use crate::traits::{ComponentHandle, Exporter, Processor, Receiver};
use crate::types::{DataType, TelemetryItem};
use crate::utils::random_duration;

/// A registered component with its compiled filter, before capability checks
#[derive(Debug, Clone)]
pub struct BoundComponent {
    pub name: String,
    pub handle: ComponentHandle,
    pub filter: DataFilter,
}

impl BoundComponent {
    pub fn new(name: impl Into<String>, handle: ComponentHandle, filter: DataFilter) -> Self {
        Self {
            name: name.into(),
            handle,
            filter,
        }
    }

    /// Bind using the filter the component declares about itself
    pub fn from_handle(name: impl Into<String>, handle: ComponentHandle) -> CollectorResult<Self> {
        let filter = DataFilter::compile(&handle.component_config().filter)?;
        Ok(Self::new(name, handle, filter))
    }
}

pub struct RuntimeReceiver {
    name: String,
    receiver: Arc<dyn Receiver>,
    filter: DataFilter,
}

impl RuntimeReceiver {
    pub fn new(name: impl Into<String>, receiver: Arc<dyn Receiver>, filter: DataFilter) -> Self {
        Self {
            name: name.into(),
            receiver,
            filter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn receiver(&self) -> &Arc<dyn Receiver> {
        &self.receiver
    }

    pub fn filter(&self) -> &DataFilter {
        &self.filter
    }
}

/// Result of running one processor over one item
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Continue with this item
    Forward(TelemetryItem),

    /// The processor discarded the item
    Dropped,

    /// The processor failed; the item is unchanged
    Failed {
        item: TelemetryItem,
        error: CollectorError,
    },
}

pub struct RuntimeProcessor {
    name: String,
    processor: Arc<dyn Processor>,
    filter: DataFilter,
}

impl RuntimeProcessor {
    pub fn new(name: impl Into<String>, processor: Arc<dyn Processor>, filter: DataFilter) -> Self {
        Self {
            name: name.into(),
            processor,
            filter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processor(&self) -> &Arc<dyn Processor> {
        &self.processor
    }

    pub fn filter(&self) -> &DataFilter {
        &self.filter
    }

    /// Dispatch `item` to the processor method for its kind
    pub async fn process(&self, item: TelemetryItem) -> ProcessOutcome {
        let result = match &item {
            TelemetryItem::Metric(m) => self
                .processor
                .process_metric(m.clone())
                .await
                .map(|out| out.map(TelemetryItem::Metric)),
            TelemetryItem::Log(l) => self
                .processor
                .process_log(l.clone())
                .await
                .map(|out| out.map(TelemetryItem::Log)),
            TelemetryItem::Span(s) => self
                .processor
                .process_span(s.clone())
                .await
                .map(|out| out.map(TelemetryItem::Span)),
            TelemetryItem::Raw(r) => self
                .processor
                .process_raw(r.clone())
                .await
                .map(|out| out.map(TelemetryItem::Raw)),
        };

        match result {
            Ok(Some(next)) => ProcessOutcome::Forward(next),
            Ok(None) => ProcessOutcome::Dropped,
            Err(error) => ProcessOutcome::Failed { item, error },
        }
    }
}

pub struct RuntimeExporter {
    name: String,
    pipeline: String,
    exporter: Arc<dyn Exporter>,
    filter: DataFilter,
    buffer: Buffer,
    interval: Duration,
    jitter: Duration,

    /// Serialises flushes between `add` and the timer loop
    flush_lock: Mutex<()>,

    /// Signals the timer loop that a size flush happened
    timer_reset: Notify,

    metrics: Arc<PipelineMetrics>,
}

impl RuntimeExporter {
    pub fn new(
        name: impl Into<String>,
        exporter: Arc<dyn Exporter>,
        filter: DataFilter,
        config: &PipelineConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            name: name.into(),
            pipeline: config.name.clone(),
            exporter,
            filter,
            buffer: Buffer::new(config.data_type, config.batch_size),
            interval: config.flush_interval(),
            jitter: config.flush_jitter(),
            flush_lock: Mutex::new(()),
            timer_reset: Notify::new(),
            metrics,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exporter(&self) -> &Arc<dyn Exporter> {
        &self.exporter
    }

    pub fn filter(&self) -> &DataFilter {
        &self.filter
    }

    pub fn data_type(&self) -> DataType {
        self.buffer.data_type()
    }

    /// Items waiting for the next flush
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Buffer `item`, flushing synchronously when the buffer fills up
    pub async fn add(&self, item: TelemetryItem) -> CollectorResult<()> {
        let _guard = self.flush_lock.lock().await;
        if self.buffer.full() {
            self.flush_locked().await;
        }
        if self.buffer.push(item)? {
            self.flush_locked().await;
            self.timer_reset.notify_one();
        }
        Ok(())
    }

    /// Export whatever is buffered
    pub async fn flush_once(&self) {
        let _guard = self.flush_lock.lock().await;
        self.flush_locked().await;
    }

    async fn flush_locked(&self) {
        let batch = self.buffer.flush_all();
        if batch.is_empty() {
            return;
        }

        let kind = batch.data_type();
        let size = batch.len();
        let orgs = batch.count_by_org();

        let result = match batch {
            Batch::Metrics(items) => self.exporter.export_metric(items).await,
            Batch::Logs(items) => self.exporter.export_log(items).await,
            Batch::Spans(items) => self.exporter.export_span(items).await,
            Batch::Raws(items) => self.exporter.export_raw(items).await,
        };

        match result {
            Ok(()) => {
                debug!(pipeline = %self.pipeline, exporter = %self.name, %kind, size, "Exported batch");
                for (org, count) in &orgs {
                    self.metrics
                        .record_exported(&self.pipeline, kind, &self.name, org, *count);
                }
            }
            Err(e) => {
                let cause = e.context();
                error!(
                    pipeline = %self.pipeline,
                    exporter = %self.name,
                    %kind,
                    size,
                    error = %e,
                    error_type = cause.error_type,
                    retryable = cause.retryable,
                    "Failed to export batch"
                );
                for (org, count) in &orgs {
                    self.metrics
                        .record_export_errors(&self.pipeline, kind, &self.name, org, *count);
                }
            }
        }
    }

    fn next_deadline(&self) -> Instant {
        Instant::now() + random_duration(self.interval, self.jitter)
    }

    /// Timer loop; returns after the final flush once `shutdown` is cancelled
    pub async fn run(self: Arc<Self>, shutdown: CancellationToken) {
        let timer = sleep(random_duration(self.interval, self.jitter));
        tokio::pin!(timer);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    self.flush_once().await;
                    debug!(pipeline = %self.pipeline, exporter = %self.name, "Exporter drained");
                    break;
                }
                _ = self.timer_reset.notified() => {
                    timer.as_mut().reset(self.next_deadline());
                }
                _ = &mut timer => {
                    self.flush_once().await;
                    timer.as_mut().reset(self.next_deadline());
                }
            }
        }
    }
}
