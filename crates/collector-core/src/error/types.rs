//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Error types for the telemetry collector
//!
//! Configuration-class errors stop a pipeline from being built. Everything
//! raised while data flows (processing, export, shutdown) is logged by the
//! pipeline and never tears it down.

use std::error::Error as StdError;
use thiserror::Error;

use crate::types::DataType;

/// Result type for collector operations
pub type CollectorResult<T> = Result<T, CollectorError>;

/// Main error type for the collector
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Invalid pipeline or component configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Configuration values failing validation rules
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Receiver side failures, including consumer hand-off
    #[error("Receive error: {message}")]
    Receive {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// A processor failed to transform an item
    #[error("Processing error: {message}")]
    Processing {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// An exporter failed to deliver a batch
    #[error("Export error: {message}")]
    Export {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Storage backend failures
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Stage channel closed or cancelled
    #[error("Channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// An item of one kind reached a component bound to another
    #[error("Kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: DataType, actual: DataType },

    /// A component does not handle the requested data kind
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

// Constructors: `x(message)` and `x_with_source(message, source)` per variant
impl CollectorError {
    pub fn configuration(message: impl Into<String>) -> Self {
        CollectorError::Configuration {
            message: message.into(),
            source: None,
        }
    }

    pub fn configuration_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        CollectorError::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CollectorError::Validation {
            message: message.into(),
            source: None,
        }
    }

    pub fn validation_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        CollectorError::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn receive(message: impl Into<String>) -> Self {
        CollectorError::Receive {
            message: message.into(),
            source: None,
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        CollectorError::Processing {
            message: message.into(),
            source: None,
        }
    }

    pub fn processing_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        CollectorError::Processing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        CollectorError::Export {
            message: message.into(),
            source: None,
        }
    }

    pub fn export_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        CollectorError::Export {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CollectorError::Storage {
            message: message.into(),
            source: None,
        }
    }

    pub fn channel(message: impl Into<String>) -> Self {
        CollectorError::Channel {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind_mismatch(expected: DataType, actual: DataType) -> Self {
        CollectorError::KindMismatch { expected, actual }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        CollectorError::Unsupported {
            message: message.into(),
        }
    }

    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        CollectorError::Serialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn timeout_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        CollectorError::Timeout {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CollectorError::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        CollectorError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollectorError::Export { .. }
                | CollectorError::Storage { .. }
                | CollectorError::Timeout { .. }
        )
    }

    /// Check if the error is permanent
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            CollectorError::Configuration { .. }
                | CollectorError::Validation { .. }
                | CollectorError::KindMismatch { .. }
                | CollectorError::Unsupported { .. }
        )
    }

    /// Classification fields for structured logging
    pub fn context(&self) -> crate::error::ErrorContext {
        crate::error::ErrorContext::from(self)
    }

    /// Get the error type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            CollectorError::Configuration { .. } => "Configuration",
            CollectorError::Validation { .. } => "Validation",
            CollectorError::Receive { .. } => "Receive",
            CollectorError::Processing { .. } => "Processing",
            CollectorError::Export { .. } => "Export",
            CollectorError::Storage { .. } => "Storage",
            CollectorError::Channel { .. } => "Channel",
            CollectorError::KindMismatch { .. } => "KindMismatch",
            CollectorError::Unsupported { .. } => "Unsupported",
            CollectorError::Serialization { .. } => "Serialization",
            CollectorError::Timeout { .. } => "Timeout",
            CollectorError::Internal { .. } => "Internal",
        }
    }
}
