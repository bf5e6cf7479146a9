//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Pipeline executor
//!
//! Stages run as independent tasks joined by two bounded channels:
//!
//! ```text
//! receivers -> [rp] -> processor stage -> [pe] -> fan-out -> exporters
//! ```
//!
//! A full channel suspends the sender, so a slow exporter eventually stalls
//! the receivers instead of dropping data. The fan-out task hands each item
//! to every selecting exporter and waits for all of them before taking the
//! next one. Shutdown closes the stages front to back and waits for each
//! to drain before tearing down the next.

use futures::future::join_all;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock as SyncRwLock};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::config::PipelineConfig;
use super::runtime::{
    BoundComponent, ProcessOutcome, RuntimeExporter, RuntimeProcessor, RuntimeReceiver,
};
use super::state::PipelineState;
use crate::error::{CollectorError, CollectorResult};
use crate::metrics::PipelineMetrics;
use crate::traits::Consumer;
use crate::types::{DataType, ObservableData, TelemetryItem};

type SenderSlot = Arc<SyncRwLock<Option<mpsc::Sender<TelemetryItem>>>>;

/// Labels and counters shared by every stage task
#[derive(Clone)]
struct StageContext {
    pipeline: Arc<str>,
    kind: DataType,
    metrics: Arc<PipelineMetrics>,
}

/// A homogeneous telemetry pipeline
pub struct Pipeline {
    /// Pipeline configuration
    config: PipelineConfig,

    /// Stage counters
    metrics: Arc<PipelineMetrics>,

    receivers: Vec<Arc<RuntimeReceiver>>,

    processors: Vec<Arc<RuntimeProcessor>>,

    exporters: Vec<Arc<RuntimeExporter>>,

    /// Receiver side of `rp`; emptied on close so consumers stop sending
    rp_sender: SenderSlot,

    /// Unblocks consumer sends still waiting on a full `rp` at shutdown
    cancel: CancellationToken,

    /// Processor stage; yields the `pe` sender back when `rp` is drained
    processor_task: Mutex<Option<JoinHandle<mpsc::Sender<TelemetryItem>>>>,

    /// Fan-out task plus one timer loop per exporter
    exporter_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Pipeline state
    state: RwLock<PipelineState>,
}

impl Pipeline {
    /// Create an empty pipeline; components are attached by [`Pipeline::init_components`]
    pub fn new(config: PipelineConfig, metrics: Arc<PipelineMetrics>) -> CollectorResult<Self> {
        config.validate_config()?;
        Ok(Self {
            config,
            metrics,
            receivers: Vec::new(),
            processors: Vec::new(),
            exporters: Vec::new(),
            rp_sender: Arc::new(SyncRwLock::new(None)),
            cancel: CancellationToken::new(),
            processor_task: Mutex::new(None),
            exporter_tasks: Mutex::new(Vec::new()),
            state: RwLock::new(PipelineState::default()),
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn data_type(&self) -> DataType {
        self.config.data_type
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<PipelineMetrics> {
        &self.metrics
    }

    pub fn exporters(&self) -> &[Arc<RuntimeExporter>] {
        &self.exporters
    }

    /// Get pipeline state
    pub async fn get_state(&self) -> PipelineState {
        self.state.read().await.clone()
    }

    /// Check each component for the capability its stage needs and wrap it.
    ///
    /// Fails without touching the pipeline when any component is of the
    /// wrong kind or an exporter cannot carry the pipeline's data type.
    pub fn init_components(
        &mut self,
        receivers: Vec<BoundComponent>,
        processors: Vec<BoundComponent>,
        exporters: Vec<BoundComponent>,
    ) -> CollectorResult<()> {
        if receivers.is_empty() {
            return Err(CollectorError::configuration(format!(
                "Pipeline {} has no receivers configured",
                self.config.name
            )));
        }
        if exporters.is_empty() {
            return Err(CollectorError::configuration(format!(
                "Pipeline {} has no exporters configured",
                self.config.name
            )));
        }

        let mut runtime_receivers = Vec::with_capacity(receivers.len());
        for component in receivers {
            let receiver = component
                .handle
                .as_receiver()
                .ok_or_else(|| self.capability_error(&component, "receiver"))?;
            runtime_receivers.push(Arc::new(RuntimeReceiver::new(
                component.name,
                receiver,
                component.filter,
            )));
        }

        let mut runtime_processors = Vec::with_capacity(processors.len());
        for component in processors {
            let processor = component
                .handle
                .as_processor()
                .ok_or_else(|| self.capability_error(&component, "processor"))?;
            runtime_processors.push(Arc::new(RuntimeProcessor::new(
                component.name,
                processor,
                component.filter,
            )));
        }

        let mut runtime_exporters = Vec::with_capacity(exporters.len());
        for component in exporters {
            let exporter = component
                .handle
                .as_exporter()
                .ok_or_else(|| self.capability_error(&component, "exporter"))?;
            if !exporter.supports(self.config.data_type) {
                return Err(CollectorError::configuration(format!(
                    "Exporter {} in pipeline {} does not support {} data",
                    component.name, self.config.name, self.config.data_type
                )));
            }
            runtime_exporters.push(Arc::new(RuntimeExporter::new(
                component.name,
                exporter,
                component.filter,
                &self.config,
                Arc::clone(&self.metrics),
            )));
        }

        self.receivers = runtime_receivers;
        self.processors = runtime_processors;
        self.exporters = runtime_exporters;

        info!(
            pipeline = %self.config.name,
            kind = %self.config.data_type,
            receivers = self.receivers.len(),
            processors = self.processors.len(),
            exporters = self.exporters.len(),
            "Initialized pipeline components"
        );
        Ok(())
    }

    fn capability_error(&self, component: &BoundComponent, expected: &str) -> CollectorError {
        CollectorError::configuration(format!(
            "Component {} in pipeline {} is registered as {}, expected {}",
            component.name,
            self.config.name,
            component.handle.kind(),
            expected
        ))
    }

    fn context(&self) -> StageContext {
        StageContext {
            pipeline: Arc::from(self.config.name.as_str()),
            kind: self.config.data_type,
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Connect exporters, spawn the stage tasks and register receiver consumers
    pub async fn start_stream(&self) -> CollectorResult<()> {
        let mut state = self.state.write().await;
        if state.running {
            return Err(CollectorError::internal(format!(
                "Pipeline {} is already running",
                self.config.name
            )));
        }
        if state.is_closed() {
            return Err(CollectorError::internal(format!(
                "Pipeline {} was closed and cannot be restarted",
                self.config.name
            )));
        }

        info!(pipeline = %self.config.name, "Starting pipeline");

        for exporter in &self.exporters {
            exporter.exporter().connect().await.map_err(|e| {
                CollectorError::configuration_with_source(
                    format!(
                        "Exporter {} in pipeline {} failed to connect",
                        exporter.name(),
                        self.config.name
                    ),
                    e,
                )
            })?;
        }

        let ctx = self.context();
        let (rp_tx, rp_rx) = mpsc::channel(self.config.rp_channel_cap);
        let (pe_tx, pe_rx) = mpsc::channel(self.config.pe_channel_cap);

        // exporter stage
        let exporters_done = CancellationToken::new();
        let mut exporter_tasks = Vec::with_capacity(self.exporters.len() + 1);
        for exporter in &self.exporters {
            exporter_tasks.push(tokio::spawn(
                Arc::clone(exporter).run(exporters_done.clone()),
            ));
        }
        exporter_tasks.push(tokio::spawn(fan_out(
            pe_rx,
            self.exporters.clone(),
            ctx.clone(),
            exporters_done,
        )));
        *self.exporter_tasks.lock() = exporter_tasks;

        // processor stage
        *self.processor_task.lock() = Some(tokio::spawn(run_processors(
            rp_rx,
            pe_tx,
            self.processors.clone(),
            ctx.clone(),
        )));

        // receiver stage
        *self.rp_sender.write() = Some(rp_tx);
        for receiver in &self.receivers {
            receiver
                .receiver()
                .register_consumer(self.consumer_for(receiver, ctx.clone()));
        }

        state.running = true;
        state.start_time = Some(chrono::Utc::now());

        info!(pipeline = %self.config.name, kind = %self.config.data_type, "Pipeline started");
        Ok(())
    }

    fn consumer_for(&self, receiver: &Arc<RuntimeReceiver>, ctx: StageContext) -> Consumer {
        let slot = Arc::clone(&self.rp_sender);
        let cancel = self.cancel.clone();
        let receiver = Arc::clone(receiver);

        Arc::new(move |item: TelemetryItem| {
            let slot = Arc::clone(&slot);
            let cancel = cancel.clone();
            let receiver = Arc::clone(&receiver);
            let ctx = ctx.clone();
            async move { consume(item, &receiver, &slot, &cancel, &ctx).await }.boxed()
        })
    }

    /// Stop the pipeline, draining every stage before closing the next.
    ///
    /// Component close failures are logged and do not interrupt shutdown.
    pub async fn close(&self) -> CollectorResult<()> {
        let mut state = self.state.write().await;
        if !state.running {
            return Err(CollectorError::internal(format!(
                "Pipeline {} is not running",
                self.config.name
            )));
        }

        info!(pipeline = %self.config.name, "Closing pipeline");

        for receiver in &self.receivers {
            if let Err(e) = receiver.receiver().close().await {
                error!(pipeline = %self.config.name, receiver = receiver.name(), error = %e, "Error closing receiver");
            }
        }

        self.cancel.cancel();
        self.rp_sender.write().take();

        let processor_task = self.processor_task.lock().take();
        let pe_sender = match processor_task {
            Some(task) => match task.await {
                Ok(sender) => Some(sender),
                Err(e) => {
                    error!(pipeline = %self.config.name, error = %e, "Processor stage terminated abnormally");
                    None
                }
            },
            None => None,
        };

        for processor in &self.processors {
            if let Err(e) = processor.processor().close().await {
                error!(pipeline = %self.config.name, processor = processor.name(), error = %e, "Error closing processor");
            }
        }

        drop(pe_sender);

        let exporter_tasks = std::mem::take(&mut *self.exporter_tasks.lock());
        for result in join_all(exporter_tasks).await {
            if let Err(e) = result {
                error!(pipeline = %self.config.name, error = %e, "Exporter stage terminated abnormally");
            }
        }

        for exporter in &self.exporters {
            if let Err(e) = exporter.exporter().close().await {
                error!(pipeline = %self.config.name, exporter = exporter.name(), error = %e, "Error closing exporter");
            }
        }

        state.running = false;
        state.stop_time = Some(chrono::Utc::now());

        info!(pipeline = %self.config.name, "Pipeline closed");
        Ok(())
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        // stage tasks wind down on their own once `rp` closes
        self.cancel.cancel();
        self.rp_sender.write().take();
    }
}

/// Receiver stage: gate one item and hand it to `rp`
async fn consume(
    item: TelemetryItem,
    receiver: &RuntimeReceiver,
    slot: &SenderSlot,
    cancel: &CancellationToken,
    ctx: &StageContext,
) -> CollectorResult<()> {
    let actual = item.data_type();
    if actual != ctx.kind {
        return Err(CollectorError::kind_mismatch(ctx.kind, actual));
    }
    if !receiver.filter().selected(&item) {
        return Ok(());
    }

    let sender = slot.read().clone().ok_or_else(|| {
        CollectorError::channel(format!("Pipeline {} is not accepting items", ctx.pipeline))
    })?;

    let org = item.org_name().to_string();
    tokio::select! {
        sent = sender.send(item) => {
            sent.map_err(|_| {
                CollectorError::channel(format!("Pipeline {} processor stage has stopped", ctx.pipeline))
            })?;
        }
        _ = cancel.cancelled() => {
            return Err(CollectorError::channel(format!(
                "Pipeline {} is shutting down",
                ctx.pipeline
            )));
        }
    }

    ctx.metrics
        .record_received(&ctx.pipeline, ctx.kind, receiver.name(), &org);
    Ok(())
}

/// Processor stage loop; returns the `pe` sender once `rp` is closed and drained
async fn run_processors(
    mut rp: mpsc::Receiver<TelemetryItem>,
    pe: mpsc::Sender<TelemetryItem>,
    processors: Vec<Arc<RuntimeProcessor>>,
    ctx: StageContext,
) -> mpsc::Sender<TelemetryItem> {
    while let Some(item) = rp.recv().await {
        if let Some(item) = apply_processors(item, &processors, &ctx).await {
            if pe.send(item).await.is_err() {
                warn!(pipeline = %ctx.pipeline, "Exporter stage stopped, discarding item");
            }
        }
    }
    debug!(pipeline = %ctx.pipeline, "Processor stage drained");
    pe
}

async fn apply_processors(
    mut item: TelemetryItem,
    processors: &[Arc<RuntimeProcessor>],
    ctx: &StageContext,
) -> Option<TelemetryItem> {
    for processor in processors {
        if !processor.filter().selected(&item) {
            continue;
        }

        let org = item.org_name().to_string();
        match processor.process(item).await {
            ProcessOutcome::Forward(next) => {
                ctx.metrics
                    .record_processed(&ctx.pipeline, ctx.kind, processor.name(), &org);
                item = next;
            }
            ProcessOutcome::Dropped => {
                ctx.metrics
                    .record_processed(&ctx.pipeline, ctx.kind, processor.name(), &org);
                ctx.metrics
                    .record_dropped(&ctx.pipeline, ctx.kind, processor.name(), &org);
                debug!(pipeline = %ctx.pipeline, processor = processor.name(), "Item dropped");
                return None;
            }
            ProcessOutcome::Failed { item: original, error } => {
                let cause = error.context();
                error!(
                    pipeline = %ctx.pipeline,
                    processor = processor.name(),
                    error = %error,
                    error_type = cause.error_type,
                    retryable = cause.retryable,
                    "Processor failed, passing item through unchanged"
                );
                ctx.metrics
                    .record_processor_error(&ctx.pipeline, ctx.kind, processor.name(), &org);
                item = original;
            }
        }
    }
    Some(item)
}

/// Exporter fan-out loop; signals `done` once `pe` is closed and drained
async fn fan_out(
    mut pe: mpsc::Receiver<TelemetryItem>,
    exporters: Vec<Arc<RuntimeExporter>>,
    ctx: StageContext,
    done: CancellationToken,
) {
    let ctx = &ctx;
    while let Some(item) = pe.recv().await {
        let adds = exporters
            .iter()
            .filter(|exporter| exporter.filter().selected(&item))
            .map(|exporter| {
                let item = item.clone();
                async move {
                    let org = item.org_name().to_string();
                    if let Err(e) = exporter.add(item).await {
                        let cause = e.context();
                        error!(
                            pipeline = %ctx.pipeline,
                            exporter = exporter.name(),
                            error = %e,
                            error_type = cause.error_type,
                            permanent = cause.permanent,
                            "Failed to buffer item"
                        );
                        ctx.metrics
                            .record_export_errors(&ctx.pipeline, ctx.kind, exporter.name(), &org, 1);
                    }
                }
            });
        join_all(adds).await;
    }
    debug!(pipeline = %ctx.pipeline, "Exporter fan-out drained");
    done.cancel();
}
