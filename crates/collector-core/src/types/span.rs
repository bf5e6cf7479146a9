//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Span data structure for the telemetry collector
//!
//! Trace semantics belong to the tracing subsystem. The collector only moves
//! spans around and exposes their attributes as the tag set.

use serde::{Deserialize, Serialize};

use super::Tags;

/// A finished span
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    #[serde(rename = "traceID")]
    pub trace_id: String,

    #[serde(rename = "spanID")]
    pub span_id: String,

    #[serde(rename = "parentSpanID", default)]
    pub parent_span_id: String,

    #[serde(default)]
    pub name: String,

    /// Start time in unix nanoseconds
    #[serde(rename = "startTimeUnixNano", default)]
    pub start_time: i64,

    /// End time in unix nanoseconds
    #[serde(rename = "endTimeUnixNano", default)]
    pub end_time: i64,

    #[serde(default)]
    pub attributes: Tags,
}

impl Span {
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
