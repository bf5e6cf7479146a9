//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Top-level collector configuration

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use validator::Validate;

use super::LoggingConfig;
use crate::error::{CollectorError, CollectorResult};
use crate::filter::FilterConfig;
use crate::metrics::MetricsConfig;
use crate::pipeline::PipelineConfig;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/collector.toml";

/// Prefix for environment overrides, e.g. `COLLECTOR_LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "COLLECTOR";

/// Per-component settings declared in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentSettings {
    /// Replaces the filter the component declares itself
    pub filter: Option<FilterConfig>,

    /// Component-specific options, interpreted by whoever builds the component
    pub options: Option<serde_json::Value>,
}

/// Main collector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CollectorConfig {
    /// Collector instance name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Pipeline definitions
    #[validate(nested)]
    pub pipelines: Vec<PipelineConfig>,

    /// Settings keyed by component name
    pub components: HashMap<String, ComponentSettings>,

    /// Logging configuration
    #[validate(nested)]
    pub logging: LoggingConfig,

    /// Metrics configuration
    #[validate(nested)]
    pub metrics: MetricsConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            name: "collector".to_string(),
            pipelines: Vec::new(),
            components: HashMap::new(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Load configuration from file, layered with `COLLECTOR_` environment variables
    pub fn from_file(path: impl AsRef<Path>) -> CollectorResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| {
                CollectorError::configuration_with_source("Failed to load configuration", e)
            })?;

        let collector_config: CollectorConfig = config.try_deserialize().map_err(|e| {
            CollectorError::configuration_with_source("Failed to deserialize configuration", e)
        })?;

        collector_config.validate_config()?;
        Ok(collector_config)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(content: &str) -> CollectorResult<Self> {
        let config: CollectorConfig = serde_json::from_str(content).map_err(|e| {
            CollectorError::serialization_with_source("Failed to parse configuration", e)
        })?;

        config.validate_config()?;
        Ok(config)
    }

    /// Validate field rules and cross-references
    pub fn validate_config(&self) -> CollectorResult<()> {
        self.validate().map_err(|e| {
            CollectorError::validation_with_source("Configuration validation failed", e)
        })?;

        let mut names = HashSet::new();
        for pipeline in &self.pipelines {
            if !names.insert(pipeline.name.as_str()) {
                return Err(CollectorError::validation(format!(
                    "Duplicate pipeline name: {}",
                    pipeline.name
                )));
            }
        }
        Ok(())
    }

    /// Pipelines with `enable = true`
    pub fn enabled_pipelines(&self) -> impl Iterator<Item = &PipelineConfig> {
        self.pipelines.iter().filter(|p| p.enable)
    }

    /// Filter override declared for `component`, if any
    pub fn filter_override(&self, component: &str) -> Option<&FilterConfig> {
        self.components
            .get(component)
            .and_then(|settings| settings.filter.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use crate::types::DataType;

    const SAMPLE: &str = r#"{
        "name": "edge",
        "pipelines": [
            {"name": "metrics", "data_type": "metric", "receivers": ["in"], "exporters": ["out"]},
            {"name": "logs", "data_type": "log", "receivers": ["in"], "exporters": ["out"], "enable": false}
        ],
        "components": {
            "out": {"filter": {"keypass": {"name": ["cpu*"]}}}
        },
        "logging": {"level": "debug", "format": "json"}
    }"#;

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.name, "collector");
        assert!(config.validate_config().is_ok());
    }

    #[test]
    fn test_from_json_str() {
        let config = CollectorConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.name, "edge");
        assert_eq!(config.pipelines[1].data_type, DataType::Log);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.metrics.enabled);

        let enabled: Vec<_> = config.enabled_pipelines().map(|p| p.name.as_str()).collect();
        assert_eq!(enabled, vec!["metrics"]);

        let filter = config.filter_override("out").unwrap();
        assert_eq!(filter.keypass["name"], vec!["cpu*"]);
        assert!(config.filter_override("in").is_none());
    }

    #[test]
    fn test_duplicate_pipeline_names_rejected() {
        let content = r#"{"pipelines": [{"name": "a"}, {"name": "a"}]}"#;
        assert!(matches!(
            CollectorConfig::from_json_str(content),
            Err(CollectorError::Validation { .. })
        ));
    }

    #[test]
    fn test_nested_validation() {
        let content = r#"{"pipelines": [{"name": "a", "batch_size": 0}]}"#;
        assert!(CollectorConfig::from_json_str(content).is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("collector-config-{}.json", std::process::id()));
        std::fs::write(&path, SAMPLE).unwrap();
        let config = CollectorConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.pipelines.len(), 2);
        assert_eq!(config.logging.level, "debug");
    }
}
