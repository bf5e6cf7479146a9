//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Telemetry Collector Core
//!
//! Pipeline runtime for the telemetry collector. Receivers hand items to a
//! pipeline, processors transform or drop them one at a time, and exporters
//! batch them per kind and flush on size or on a jittered timer. Every
//! component is gated by a [`DataFilter`] compiled from its configuration.
//!
//! ```text
//! receivers --rp--> processors --pe--> fan-out --> exporter buffers --> backends
//! ```

pub mod accessor;
pub mod buffer;
pub mod config;
pub mod error;
pub mod exporters;
pub mod filter;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod processors;
pub mod receivers;
pub mod registry;
pub mod storage;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use self::buffer::{Batch, Buffer};
pub use self::config::{CollectorConfig, ComponentSettings, LoggingConfig};
pub use self::error::{CollectorError, CollectorResult};
pub use self::filter::{DataFilter, FilterConfig};
pub use self::metrics::{MetricsConfig, PipelineMetrics};
pub use self::pipeline::{Pipeline, PipelineConfig, PipelineState};
pub use self::registry::ComponentRegistry;
pub use self::types::{
    DataType, FieldValue, Log, Metric, ObservableData, Raw, Span, TelemetryItem,
};

pub use self::traits::{
    ComponentConfig, ComponentHandle, Consumer, Exporter, Processor, Receiver, Selector, Storage,
    StorageIterator, Writer,
};

/// Collector version information
pub const COLLECTOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collector name
pub const COLLECTOR_NAME: &str = "collector";
