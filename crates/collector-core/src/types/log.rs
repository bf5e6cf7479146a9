//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Log data structure for the telemetry collector

use serde::{Deserialize, Serialize};

use super::Tags;

/// A single log line from a container, file or stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// Origin of the line, e.g. `container` or `job`
    #[serde(default)]
    pub source: String,

    /// Identifier of the emitting entity within `source`
    #[serde(default)]
    pub id: String,

    /// Stream name, e.g. `stdout` / `stderr`
    #[serde(default)]
    pub stream: String,

    /// Raw line content
    #[serde(default)]
    pub content: String,

    /// Offset of the line in its stream
    #[serde(default)]
    pub offset: i64,

    /// Unix timestamp in nanoseconds
    #[serde(default)]
    pub timestamp: i64,

    /// Log labels
    #[serde(default)]
    pub tags: Tags,
}

impl Log {
    /// Create a log line with the given content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Set source and id
    pub fn with_source(mut self, source: impl Into<String>, id: impl Into<String>) -> Self {
        self.source = source.into();
        self.id = id.into();
        self
    }

    /// Set the stream name
    pub fn with_stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = stream.into();
        self
    }

    /// Set the timestamp in nanoseconds
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add a label
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}
