//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Core type definitions for the telemetry collector
//!
//! The collector carries a closed set of telemetry kinds. Each kind is a
//! plain struct, and [`TelemetryItem`] is the tagged union the pipeline moves
//! between stages. Every stage boundary matches on it exhaustively, so a new
//! kind has to be handled everywhere before the crate compiles again.

pub mod data_type;
pub mod item;
pub mod log;
pub mod metric;
pub mod raw;
pub mod span;
pub mod value;

pub use data_type::DataType;
pub use item::{ObservableData, TelemetryItem};
pub use log::Log;
pub use metric::Metric;
pub use raw::Raw;
pub use span::Span;
pub use value::FieldValue;

use std::collections::HashMap;

/// Label set shared by every taggable kind
pub type Tags = HashMap<String, String>;

/// Tag key carrying the tenant for kinds without a dedicated org field
pub const ORG_NAME_TAG: &str = "org_name";
