//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Pipelines built from a configuration document

use collector_core::exporters::StorageExporter;
use collector_core::processors::ModifierProcessor;
use collector_core::receivers::ChannelReceiver;
use collector_core::storage::MemoryStorage;
use collector_core::{
    CollectorConfig, ComponentRegistry, DataType, Metric, PipelineMetrics, Selector, Storage,
    StorageIterator, TelemetryItem,
};
use std::sync::Arc;

const CONFIG: &str = r#"{
    "name": "edge",
    "pipelines": [
        {
            "name": "docker",
            "data_type": "metric",
            "receivers": ["channel"],
            "processors": ["k8s-labels"],
            "exporters": ["store"],
            "flush_interval_ms": 60000,
            "flush_jitter_ms": 0
        },
        {
            "name": "unused",
            "data_type": "log",
            "receivers": ["channel"],
            "exporters": ["store"],
            "enable": false
        }
    ],
    "components": {
        "k8s-labels": {
            "options": {
                "type": "modifier",
                "rules": [
                    { "action": "trim_prefix", "key": "kubernetes_" },
                    { "action": "add", "key": "tags.cluster", "value": "local" }
                ]
            }
        },
        "store": {
            "filter": { "keydrop": { "name": ["*_debug"] } }
        }
    }
}"#;

#[tokio::test]
async fn test_config_driven_pipeline() {
    let config = CollectorConfig::from_json_str(CONFIG).unwrap();

    let receiver = Arc::new(ChannelReceiver::new());
    let storage = Arc::new(MemoryStorage::new());
    let modifier_options = config.components["k8s-labels"].options.clone().unwrap();

    let mut registry = ComponentRegistry::new().with_settings(config.components.clone());
    registry.register_receiver("channel", receiver.clone()).unwrap();
    registry
        .register_processor(
            "k8s-labels",
            Arc::new(ModifierProcessor::from_options(&modifier_options).unwrap()),
        )
        .unwrap();
    registry
        .register_exporter("store", Arc::new(StorageExporter::new(Arc::clone(&storage))))
        .unwrap();

    let pipelines = registry
        .build_from_config(&config, Arc::new(PipelineMetrics::default()))
        .unwrap();
    assert_eq!(pipelines.len(), 1);
    let pipeline = &pipelines[0];
    assert_eq!(pipeline.name(), "docker");
    pipeline.start_stream().await.unwrap();

    let handle = receiver.handle();
    handle
        .send(
            Metric::new("docker_container_summary")
                .with_timestamp(100)
                .with_tag("kubernetes_pod_ip", "10.1.2.3")
                .into(),
        )
        .await
        .unwrap();
    handle
        .send(Metric::new("docker_debug").with_timestamp(101).into())
        .await
        .unwrap();
    pipeline.close().await.unwrap();

    let mut iter = storage
        .iterator(&Selector::new(DataType::Metric, 0, 1_000))
        .await
        .unwrap();
    let mut stored = Vec::new();
    while let Some(item) = iter.next().await.unwrap() {
        stored.push(item);
    }
    assert_eq!(stored.len(), 1);

    let TelemetryItem::Metric(metric) = &stored[0] else {
        panic!("expected a metric, got {:?}", stored[0]);
    };
    assert_eq!(metric.tags.get("pod_ip").map(String::as_str), Some("10.1.2.3"));
    assert!(!metric.tags.contains_key("kubernetes_pod_ip"));
    assert_eq!(metric.tags.get("cluster").map(String::as_str), Some("local"));
}

#[tokio::test]
async fn test_component_shared_by_two_pipelines() {
    let receiver = Arc::new(ChannelReceiver::new());
    let storage = Arc::new(MemoryStorage::new());

    let mut registry = ComponentRegistry::new();
    registry.register_receiver("channel", receiver.clone()).unwrap();
    registry
        .register_exporter("store", Arc::new(StorageExporter::new(Arc::clone(&storage))))
        .unwrap();

    let config = CollectorConfig::from_json_str(
        r#"{"pipelines": [
            {"name": "a", "receivers": ["channel"], "exporters": ["store"]},
            {"name": "b", "receivers": ["channel"], "exporters": ["store"]}
        ]}"#,
    )
    .unwrap();
    let pipelines = registry
        .build_from_config(&config, Arc::new(PipelineMetrics::default()))
        .unwrap();
    for pipeline in &pipelines {
        pipeline.start_stream().await.unwrap();
    }
    assert_eq!(receiver.consumer_count(), 2);

    receiver
        .handle()
        .send(Metric::new("cpu").into())
        .await
        .unwrap();
    for pipeline in &pipelines {
        pipeline.close().await.unwrap();
    }

    // one copy per pipeline
    assert_eq!(storage.len().await, 2);
}
