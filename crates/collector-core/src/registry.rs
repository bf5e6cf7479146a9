//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Named component registry and pipeline construction
//!
//! Components are registered once by name and may be shared by several
//! pipelines. Building a pipeline resolves its component names, compiles
//! each component's filter and hands the result to
//! [`Pipeline::init_components`].

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::config::{CollectorConfig, ComponentSettings};
use crate::error::{CollectorError, CollectorResult};
use crate::filter::DataFilter;
use crate::metrics::PipelineMetrics;
use crate::pipeline::{BoundComponent, Pipeline, PipelineConfig};
use crate::traits::{ComponentHandle, Exporter, Processor, Receiver};

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, ComponentHandle>,
    settings: HashMap<String, ComponentSettings>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the per-component settings declared in `config`
    pub fn with_settings(mut self, settings: HashMap<String, ComponentSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Register `handle` under `name`; names are unique across kinds
    pub fn register(&mut self, name: impl Into<String>, handle: ComponentHandle) -> CollectorResult<()> {
        let name = name.into();
        if self.components.contains_key(&name) {
            return Err(CollectorError::configuration(format!(
                "Component {} is already registered",
                name
            )));
        }
        info!(component = %name, kind = handle.kind(), "Registered component");
        self.components.insert(name, handle);
        Ok(())
    }

    pub fn register_receiver(
        &mut self,
        name: impl Into<String>,
        receiver: Arc<dyn Receiver>,
    ) -> CollectorResult<()> {
        self.register(name, ComponentHandle::Receiver(receiver))
    }

    pub fn register_processor(
        &mut self,
        name: impl Into<String>,
        processor: Arc<dyn Processor>,
    ) -> CollectorResult<()> {
        self.register(name, ComponentHandle::Processor(processor))
    }

    pub fn register_exporter(
        &mut self,
        name: impl Into<String>,
        exporter: Arc<dyn Exporter>,
    ) -> CollectorResult<()> {
        self.register(name, ComponentHandle::Exporter(exporter))
    }

    pub fn get(&self, name: &str) -> Option<&ComponentHandle> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Resolve `name` and compile its filter; a settings override wins
    pub fn bind(&self, name: &str) -> CollectorResult<BoundComponent> {
        let handle = self
            .components
            .get(name)
            .ok_or_else(|| CollectorError::configuration(format!("Unknown component: {}", name)))?;

        match self.settings.get(name).and_then(|s| s.filter.as_ref()) {
            Some(filter) => Ok(BoundComponent::new(
                name,
                handle.clone(),
                DataFilter::compile(filter)?,
            )),
            None => BoundComponent::from_handle(name, handle.clone()),
        }
    }

    fn bind_all(&self, names: &[String]) -> CollectorResult<Vec<BoundComponent>> {
        names.iter().map(|name| self.bind(name)).collect()
    }

    /// Build one pipeline from its configuration
    pub fn build_pipeline(
        &self,
        config: &PipelineConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> CollectorResult<Pipeline> {
        let receivers = self.bind_all(&config.receivers)?;
        let processors = self.bind_all(&config.processors)?;
        let exporters = self.bind_all(&config.exporters)?;

        let mut pipeline = Pipeline::new(config.clone(), metrics)?;
        pipeline.init_components(receivers, processors, exporters)?;
        Ok(pipeline)
    }

    /// Build every enabled pipeline; the first configuration error aborts
    pub fn build_pipelines(
        &self,
        configs: &[PipelineConfig],
        metrics: Arc<PipelineMetrics>,
    ) -> CollectorResult<Vec<Pipeline>> {
        let mut pipelines = Vec::new();
        for config in configs {
            if !config.enable {
                info!(pipeline = %config.name, "Pipeline disabled, skipping");
                continue;
            }
            pipelines.push(self.build_pipeline(config, Arc::clone(&metrics))?);
        }
        Ok(pipelines)
    }

    /// Build the pipelines of a loaded collector configuration
    pub fn build_from_config(
        &self,
        config: &CollectorConfig,
        metrics: Arc<PipelineMetrics>,
    ) -> CollectorResult<Vec<Pipeline>> {
        self.build_pipelines(&config.pipelines, metrics)
    }
}
