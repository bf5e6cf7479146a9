//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Error conversions for the telemetry collector
//!
//! Pattern and config errors map to `Configuration` since they can only
//! surface while a pipeline is being built.

use super::types::CollectorError;

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        CollectorError::internal_with_source("IO error", err)
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        CollectorError::serialization_with_source("JSON serialization error", err)
    }
}

impl From<config::ConfigError> for CollectorError {
    fn from(err: config::ConfigError) -> Self {
        CollectorError::configuration_with_source("Configuration error", err)
    }
}

impl From<validator::ValidationErrors> for CollectorError {
    fn from(err: validator::ValidationErrors) -> Self {
        CollectorError::validation_with_source("Validation error", err)
    }
}

impl From<glob::PatternError> for CollectorError {
    fn from(err: glob::PatternError) -> Self {
        CollectorError::configuration_with_source("Invalid glob pattern", err)
    }
}

impl From<regex::Error> for CollectorError {
    fn from(err: regex::Error) -> Self {
        CollectorError::configuration_with_source("Invalid regular expression", err)
    }
}

impl From<tokio::time::error::Elapsed> for CollectorError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        CollectorError::timeout_with_source("Operation timeout", err)
    }
}
