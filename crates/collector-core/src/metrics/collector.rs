//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Pipeline stage counters
//!
//! Every increment is sent to the `metrics` facade, so an installed recorder
//! sees it, and mirrored into an in-process registry for snapshots.

use dashmap::DashMap;
use metrics::counter;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::config::MetricsConfig;
use crate::types::DataType;

pub const RECEIVER_ITEMS_TOTAL: &str = "collector_receiver_items_total";
pub const PROCESSOR_ITEMS_TOTAL: &str = "collector_processor_items_total";
pub const PROCESSOR_DROPPED_TOTAL: &str = "collector_processor_dropped_total";
pub const PROCESSOR_ERRORS_TOTAL: &str = "collector_processor_errors_total";
pub const EXPORTER_ITEMS_TOTAL: &str = "collector_exporter_items_total";
pub const EXPORTER_ERRORS_TOTAL: &str = "collector_exporter_errors_total";

/// Identity of one counter series
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub name: &'static str,
    pub pipeline: String,
    pub kind: DataType,
    pub component: String,
    pub org: String,
}

/// Stage counters keyed by pipeline, kind, component and org
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    config: MetricsConfig,
    registry: DashMap<CounterKey, AtomicU64>,
}

impl PipelineMetrics {
    pub fn new(config: MetricsConfig) -> Self {
        Self {
            config,
            registry: DashMap::new(),
        }
    }

    /// Registry that records nothing
    pub fn disabled() -> Self {
        Self::new(MetricsConfig {
            enabled: false,
            ..Default::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn record_received(&self, pipeline: &str, kind: DataType, component: &str, org: &str) {
        self.increment(RECEIVER_ITEMS_TOTAL, pipeline, kind, component, org, 1);
    }

    pub fn record_processed(&self, pipeline: &str, kind: DataType, component: &str, org: &str) {
        self.increment(PROCESSOR_ITEMS_TOTAL, pipeline, kind, component, org, 1);
    }

    pub fn record_dropped(&self, pipeline: &str, kind: DataType, component: &str, org: &str) {
        self.increment(PROCESSOR_DROPPED_TOTAL, pipeline, kind, component, org, 1);
    }

    pub fn record_processor_error(
        &self,
        pipeline: &str,
        kind: DataType,
        component: &str,
        org: &str,
    ) {
        self.increment(PROCESSOR_ERRORS_TOTAL, pipeline, kind, component, org, 1);
    }

    pub fn record_exported(
        &self,
        pipeline: &str,
        kind: DataType,
        component: &str,
        org: &str,
        count: u64,
    ) {
        self.increment(EXPORTER_ITEMS_TOTAL, pipeline, kind, component, org, count);
    }

    pub fn record_export_errors(
        &self,
        pipeline: &str,
        kind: DataType,
        component: &str,
        org: &str,
        count: u64,
    ) {
        self.increment(EXPORTER_ERRORS_TOTAL, pipeline, kind, component, org, count);
    }

    fn increment(
        &self,
        name: &'static str,
        pipeline: &str,
        kind: DataType,
        component: &str,
        org: &str,
        count: u64,
    ) {
        if !self.config.enabled || count == 0 {
            return;
        }

        counter!(
            name,
            "pipeline" => pipeline.to_string(),
            "kind" => kind.as_str(),
            "component" => component.to_string(),
            "org" => org.to_string()
        )
        .increment(count);

        let key = CounterKey {
            name,
            pipeline: pipeline.to_string(),
            kind,
            component: component.to_string(),
            org: org.to_string(),
        };
        self.registry
            .entry(key)
            .or_default()
            .fetch_add(count, Ordering::Relaxed);
    }

    /// Sum of `name` for one component of one pipeline, across kinds and orgs
    pub fn total(&self, name: &str, pipeline: &str, component: &str) -> u64 {
        self.registry
            .iter()
            .filter(|entry| {
                let key = entry.key();
                key.name == name && key.pipeline == pipeline && key.component == component
            })
            .map(|entry| entry.value().load(Ordering::Relaxed))
            .sum()
    }

    /// Point-in-time copy of every series
    pub fn snapshot(&self) -> HashMap<CounterKey, u64> {
        self.registry
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }
}
