//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Undecoded payloads for the telemetry collector

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An opaque payload, typically a JSON document, with transport metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Raw {
    /// Payload bytes
    pub data: Vec<u8>,

    /// Transport metadata (headers, topic, partition, ...)
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

#[derive(Deserialize)]
struct NameOnly {
    #[serde(default)]
    name: String,
}

impl Raw {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            meta: HashMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// The payload's `name` member; empty when the payload is not a JSON
    /// object or has no string `name`.
    pub fn get_name(&self) -> String {
        serde_json::from_slice::<NameOnly>(&self.data)
            .map(|n| n.name)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_name() {
        let raw = Raw::new(r#"{"name":"docker_container_summary","fields":{"x":1}}"#);
        assert_eq!(raw.get_name(), "docker_container_summary");
    }

    #[test]
    fn test_get_name_parse_failure() {
        assert_eq!(Raw::new("not json").get_name(), "");
        assert_eq!(Raw::new(r#"{"name": 5}"#).get_name(), "");
        assert_eq!(Raw::new(r#"{"other":"x"}"#).get_name(), "");
    }
}
