//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Pipeline behaviour driven through an in-process receiver

use async_trait::async_trait;
use collector_core::metrics::collector::{
    EXPORTER_ITEMS_TOTAL, PROCESSOR_DROPPED_TOTAL, PROCESSOR_ERRORS_TOTAL, RECEIVER_ITEMS_TOTAL,
};
use collector_core::pipeline::BoundComponent;
use collector_core::receivers::ChannelReceiver;
use collector_core::{
    CollectorError, CollectorResult, ComponentHandle, DataFilter, DataType, Exporter, FieldValue,
    FilterConfig, Log, Metric, Pipeline, PipelineConfig, PipelineMetrics, Processor, Raw, Span,
    TelemetryItem,
};
use mockall::mock;
use mockall::predicate;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

mock! {
    NoopProcessor {}

    #[async_trait]
    impl Processor for NoopProcessor {
        async fn process_metric(&self, item: Metric) -> CollectorResult<Option<Metric>>;
        async fn process_log(&self, item: Log) -> CollectorResult<Option<Log>>;
        async fn process_span(&self, item: Span) -> CollectorResult<Option<Span>>;
        async fn process_raw(&self, item: Raw) -> CollectorResult<Option<Raw>>;
    }
}

mock! {
    MetricSink {}

    #[async_trait]
    impl Exporter for MetricSink {
        fn supports(&self, data_type: DataType) -> bool;
        async fn export_metric(&self, items: Vec<Metric>) -> CollectorResult<()>;
    }
}

/// Records every batch; optionally waits for a permit before each export
#[derive(Default)]
struct CapturingExporter {
    batches: Mutex<Vec<Vec<Metric>>>,
    gate: Option<Semaphore>,
}

impl CapturingExporter {
    fn gated() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            gate: Some(Semaphore::new(0)),
        }
    }

    fn names(&self) -> Vec<String> {
        self.batches
            .lock()
            .iter()
            .flatten()
            .map(|m| m.name.clone())
            .collect()
    }
}

#[async_trait]
impl Exporter for CapturingExporter {
    fn supports(&self, data_type: DataType) -> bool {
        data_type == DataType::Metric
    }

    async fn export_metric(&self, items: Vec<Metric>) -> CollectorResult<()> {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        self.batches.lock().push(items);
        Ok(())
    }
}

/// Records batches of every kind
#[derive(Default)]
struct AnyKindSink {
    batches: Mutex<Vec<Vec<TelemetryItem>>>,
}

impl AnyKindSink {
    fn record<T: Into<TelemetryItem>>(&self, items: Vec<T>) -> CollectorResult<()> {
        self.batches
            .lock()
            .push(items.into_iter().map(Into::into).collect());
        Ok(())
    }
}

#[async_trait]
impl Exporter for AnyKindSink {
    fn supports(&self, _data_type: DataType) -> bool {
        true
    }

    async fn export_metric(&self, items: Vec<Metric>) -> CollectorResult<()> {
        self.record(items)
    }

    async fn export_log(&self, items: Vec<Log>) -> CollectorResult<()> {
        self.record(items)
    }

    async fn export_span(&self, items: Vec<Span>) -> CollectorResult<()> {
        self.record(items)
    }

    async fn export_raw(&self, items: Vec<Raw>) -> CollectorResult<()> {
        self.record(items)
    }
}

/// Drops log lines containing `noise`, stamps the rest, and drops empty raw payloads
struct LogAndRawCleaner;

#[async_trait]
impl Processor for LogAndRawCleaner {
    async fn process_log(&self, item: Log) -> CollectorResult<Option<Log>> {
        if item.content.contains("noise") {
            return Ok(None);
        }
        Ok(Some(item.with_tag("cleaned", "true")))
    }

    async fn process_raw(&self, item: Raw) -> CollectorResult<Option<Raw>> {
        if item.data.is_empty() {
            return Ok(None);
        }
        Ok(Some(item.with_meta("cleaned", "true")))
    }
}

/// Drops metrics named `drop_me`
struct DropNamed;

#[async_trait]
impl Processor for DropNamed {
    async fn process_metric(&self, item: Metric) -> CollectorResult<Option<Metric>> {
        if item.name == "drop_me" {
            return Ok(None);
        }
        Ok(Some(item))
    }
}

/// Fails on every metric
struct AlwaysFails;

#[async_trait]
impl Processor for AlwaysFails {
    async fn process_metric(&self, _item: Metric) -> CollectorResult<Option<Metric>> {
        Err(CollectorError::processing("enrichment backend down"))
    }
}

fn bound(name: &str, handle: ComponentHandle) -> BoundComponent {
    BoundComponent::new(name, handle, DataFilter::pass_all())
}

fn config(name: &str) -> PipelineConfig {
    PipelineConfig {
        batch_size: 100,
        flush_interval_ms: 60_000,
        flush_jitter_ms: 0,
        ..PipelineConfig::new(name, DataType::Metric)
    }
}

#[tokio::test]
async fn test_single_metric_end_to_end() {
    let metrics = Arc::new(PipelineMetrics::default());
    let mut pipeline = Pipeline::new(config("e2e"), Arc::clone(&metrics)).unwrap();

    let receiver = Arc::new(ChannelReceiver::new());

    let mut processor = MockNoopProcessor::new();
    processor
        .expect_process_metric()
        .times(1)
        .returning(|item| Ok(Some(item)));

    let mut exporter = MockMetricSink::new();
    exporter
        .expect_supports()
        .returning(|data_type| data_type == DataType::Metric);
    exporter
        .expect_export_metric()
        .times(1)
        .with(predicate::function(|items: &Vec<Metric>| {
            items.len() == 1
                && items[0].name == "cpu"
                && items[0].org_name == "erda"
                && items[0].fields.get("usage") == Some(&FieldValue::Int(1))
        }))
        .returning(|_| Ok(()));

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![bound("noop", ComponentHandle::Processor(Arc::new(processor)))],
            vec![bound("sink", ComponentHandle::Exporter(Arc::new(exporter)))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    let metric = Metric::new("cpu").with_org_name("erda").with_field("usage", 1);
    receiver.handle().send(metric.into()).await.unwrap();

    pipeline.close().await.unwrap();

    assert_eq!(metrics.total(RECEIVER_ITEMS_TOTAL, "e2e", "in"), 1);
    assert_eq!(metrics.total(EXPORTER_ITEMS_TOTAL, "e2e", "sink"), 1);
    let per_org: u64 = metrics
        .snapshot()
        .iter()
        .filter(|(key, _)| key.name == EXPORTER_ITEMS_TOTAL && key.org == "erda")
        .map(|(_, v)| *v)
        .sum();
    assert_eq!(per_org, 1);
}

#[tokio::test]
async fn test_shutdown_drains_every_item_exactly_once() {
    let mut pipeline = Pipeline::new(config("drain"), Arc::new(PipelineMetrics::default())).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let exporter = Arc::new(CapturingExporter::default());

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![],
            vec![bound("out", ComponentHandle::Exporter(exporter.clone()))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    let handle = receiver.handle();
    let items = (0..5).map(|i| Metric::new(format!("m{}", i)).into());
    assert_eq!(handle.send_all(items).await.unwrap(), 5);
    assert!(exporter.batches.lock().is_empty());

    pipeline.close().await.unwrap();

    let batches = exporter.batches.lock().len();
    assert_eq!(batches, 1);
    assert_eq!(exporter.names(), vec!["m0", "m1", "m2", "m3", "m4"]);
    assert!(handle.send(Metric::new("late").into()).await.is_err());
}

#[tokio::test]
async fn test_size_flush_splits_batches_in_order() {
    let cfg = PipelineConfig {
        batch_size: 2,
        ..config("sized")
    };
    let mut pipeline = Pipeline::new(cfg, Arc::new(PipelineMetrics::default())).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let exporter = Arc::new(CapturingExporter::default());

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![],
            vec![bound("out", ComponentHandle::Exporter(exporter.clone()))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    let items = (0..5).map(|i| Metric::new(format!("m{}", i)).into());
    receiver.handle().send_all(items).await.unwrap();
    pipeline.close().await.unwrap();

    let sizes: Vec<usize> = exporter.batches.lock().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(exporter.names(), vec!["m0", "m1", "m2", "m3", "m4"]);
}

#[tokio::test]
async fn test_slow_exporter_blocks_producer_without_loss() {
    let cfg = PipelineConfig {
        batch_size: 1,
        rp_channel_cap: 1,
        pe_channel_cap: 1,
        ..config("backpressure")
    };
    let mut pipeline = Pipeline::new(cfg, Arc::new(PipelineMetrics::default())).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let exporter = Arc::new(CapturingExporter::gated());

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![],
            vec![bound("slow", ComponentHandle::Exporter(exporter.clone()))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    const TOTAL: usize = 20;
    let sent = Arc::new(AtomicUsize::new(0));
    let producer = {
        let handle = receiver.handle();
        let sent = Arc::clone(&sent);
        tokio::spawn(async move {
            for i in 0..TOTAL {
                handle.send(Metric::new(format!("m{}", i)).into()).await.unwrap();
                sent.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    let accepted = sent.load(Ordering::SeqCst);
    assert!(accepted < TOTAL, "producer was never blocked ({} sent)", accepted);
    assert!(!producer.is_finished());
    assert!(exporter.batches.lock().is_empty());

    if let Some(gate) = &exporter.gate {
        gate.add_permits(TOTAL);
    }
    producer.await.unwrap();
    pipeline.close().await.unwrap();

    let expected: Vec<String> = (0..TOTAL).map(|i| format!("m{}", i)).collect();
    assert_eq!(exporter.names(), expected);
}

#[tokio::test]
async fn test_dropped_items_skip_later_processors_and_exporters() {
    let metrics = Arc::new(PipelineMetrics::default());
    let mut pipeline = Pipeline::new(config("drops"), Arc::clone(&metrics)).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let exporter = Arc::new(CapturingExporter::default());

    let mut downstream = MockNoopProcessor::new();
    downstream
        .expect_process_metric()
        .times(1)
        .withf(|item| item.name == "keep")
        .returning(|item| Ok(Some(item)));

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![
                bound("dropper", ComponentHandle::Processor(Arc::new(DropNamed))),
                bound("downstream", ComponentHandle::Processor(Arc::new(downstream))),
            ],
            vec![bound("out", ComponentHandle::Exporter(exporter.clone()))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    let handle = receiver.handle();
    handle.send(Metric::new("drop_me").into()).await.unwrap();
    handle.send(Metric::new("keep").into()).await.unwrap();
    pipeline.close().await.unwrap();

    assert_eq!(exporter.names(), vec!["keep"]);
    assert_eq!(metrics.total(PROCESSOR_DROPPED_TOTAL, "drops", "dropper"), 1);
}

#[tokio::test]
async fn test_processor_error_passes_item_through() {
    let metrics = Arc::new(PipelineMetrics::default());
    let mut pipeline = Pipeline::new(config("errors"), Arc::clone(&metrics)).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let exporter = Arc::new(CapturingExporter::default());

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![bound("flaky", ComponentHandle::Processor(Arc::new(AlwaysFails)))],
            vec![bound("out", ComponentHandle::Exporter(exporter.clone()))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    receiver.handle().send(Metric::new("cpu").into()).await.unwrap();
    pipeline.close().await.unwrap();

    assert_eq!(exporter.names(), vec!["cpu"]);
    assert_eq!(metrics.total(PROCESSOR_ERRORS_TOTAL, "errors", "flaky"), 1);
}

#[tokio::test]
async fn test_exporter_filters_fan_out() {
    let mut pipeline = Pipeline::new(config("fanout"), Arc::new(PipelineMetrics::default())).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let everything = Arc::new(CapturingExporter::default());
    let cpu_only = Arc::new(CapturingExporter::default());
    let cpu_filter =
        DataFilter::compile(&FilterConfig::default().with_keypass("name", ["cpu*"])).unwrap();

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![],
            vec![
                bound("all", ComponentHandle::Exporter(everything.clone())),
                BoundComponent::new("cpu", ComponentHandle::Exporter(cpu_only.clone()), cpu_filter),
            ],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    let items = ["cpu_usage", "mem_used", "cpu_load"]
        .into_iter()
        .map(|name| Metric::new(name).into());
    receiver.handle().send_all(items).await.unwrap();
    pipeline.close().await.unwrap();

    assert_eq!(everything.names(), vec!["cpu_usage", "mem_used", "cpu_load"]);
    assert_eq!(cpu_only.names(), vec!["cpu_usage", "cpu_load"]);
}

#[tokio::test]
async fn test_receiver_filter_and_kind_check() {
    let metrics = Arc::new(PipelineMetrics::default());
    let mut pipeline = Pipeline::new(config("gate"), Arc::clone(&metrics)).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let exporter = Arc::new(CapturingExporter::default());
    let no_debug = DataFilter::compile(&FilterConfig::default().with_keyexclude("tags.debug")).unwrap();

    pipeline
        .init_components(
            vec![BoundComponent::new(
                "in",
                ComponentHandle::Receiver(receiver.clone()),
                no_debug,
            )],
            vec![],
            vec![bound("out", ComponentHandle::Exporter(exporter.clone()))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();

    let handle = receiver.handle();
    let err = handle.send(Log::new("wrong kind").into()).await.unwrap_err();
    assert!(matches!(
        err,
        CollectorError::KindMismatch {
            expected: DataType::Metric,
            actual: DataType::Log
        }
    ));
    handle
        .send(Metric::new("noisy").with_tag("debug", "1").into())
        .await
        .unwrap();
    handle.send(Metric::new("clean").into()).await.unwrap();
    pipeline.close().await.unwrap();

    assert_eq!(exporter.names(), vec!["clean"]);
    assert_eq!(metrics.total(RECEIVER_ITEMS_TOTAL, "gate", "in"), 1);
}

fn kind_config(name: &str, data_type: DataType) -> PipelineConfig {
    PipelineConfig {
        batch_size: 2,
        flush_interval_ms: 60_000,
        flush_jitter_ms: 0,
        ..PipelineConfig::new(name, data_type)
    }
}

async fn run_kind_pipeline(
    config: PipelineConfig,
    items: Vec<TelemetryItem>,
) -> (Arc<AnyKindSink>, Arc<PipelineMetrics>) {
    let metrics = Arc::new(PipelineMetrics::default());
    let mut pipeline = Pipeline::new(config, Arc::clone(&metrics)).unwrap();
    let receiver = Arc::new(ChannelReceiver::new());
    let sink = Arc::new(AnyKindSink::default());

    pipeline
        .init_components(
            vec![bound("in", ComponentHandle::Receiver(receiver.clone()))],
            vec![bound("cleaner", ComponentHandle::Processor(Arc::new(LogAndRawCleaner)))],
            vec![bound("sink", ComponentHandle::Exporter(sink.clone()))],
        )
        .unwrap();
    pipeline.start_stream().await.unwrap();
    receiver.handle().send_all(items).await.unwrap();
    pipeline.close().await.unwrap();
    (sink, metrics)
}

#[tokio::test]
async fn test_log_pipeline_end_to_end() {
    let items = vec![
        Log::new("service started").with_source("container", "c1").into(),
        Log::new("noise: heartbeat").into(),
        Log::new("request served").into(),
        Log::new("shutting down").into(),
    ];
    let (sink, metrics) = run_kind_pipeline(kind_config("logs", DataType::Log), items).await;

    let batches = sink.batches.lock();
    let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![2, 1]);

    let contents: Vec<&str> = batches
        .iter()
        .flatten()
        .map(|item| match item {
            TelemetryItem::Log(log) => {
                assert_eq!(log.tags.get("cleaned").map(String::as_str), Some("true"));
                log.content.as_str()
            }
            other => panic!("expected a log, got {:?}", other),
        })
        .collect();
    assert_eq!(contents, vec!["service started", "request served", "shutting down"]);
    assert_eq!(metrics.total(PROCESSOR_DROPPED_TOTAL, "logs", "cleaner"), 1);
    assert_eq!(metrics.total(EXPORTER_ITEMS_TOTAL, "logs", "sink"), 3);
}

#[tokio::test]
async fn test_raw_pipeline_end_to_end() {
    let items = vec![
        Raw::new(br#"{"name":"deploy"}"#.to_vec()).into(),
        Raw::new(Vec::new()).into(),
        Raw::new(b"not json".to_vec()).with_meta("topic", "events").into(),
    ];
    let (sink, metrics) = run_kind_pipeline(kind_config("raws", DataType::Raw), items).await;

    let batches = sink.batches.lock();
    assert_eq!(batches.len(), 1);
    let raws: Vec<&Raw> = batches[0]
        .iter()
        .map(|item| match item {
            TelemetryItem::Raw(raw) => raw,
            other => panic!("expected a raw payload, got {:?}", other),
        })
        .collect();
    assert_eq!(raws.len(), 2);
    assert_eq!(raws[0].get_name(), "deploy");
    assert_eq!(raws[1].data, b"not json".to_vec());
    assert_eq!(raws[1].meta.get("topic").map(String::as_str), Some("events"));
    assert!(raws
        .iter()
        .all(|raw| raw.meta.get("cleaned").map(String::as_str) == Some("true")));
    assert_eq!(metrics.total(PROCESSOR_DROPPED_TOTAL, "raws", "cleaner"), 1);
}
