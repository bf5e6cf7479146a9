//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Staged telemetry pipeline
//!
//! A pipeline carries one kind of telemetry from its receivers through its
//! processors to its exporters, with a bounded channel between each stage.

pub mod config;
pub mod executor;
pub mod runtime;
pub mod state;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use executor::Pipeline;
pub use runtime::{BoundComponent, ProcessOutcome, RuntimeExporter, RuntimeProcessor, RuntimeReceiver};
pub use state::PipelineState;
