//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Metric data structure for the telemetry collector

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{FieldValue, Tags};

/// A named measurement with labels and one or more field values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric name
    pub name: String,

    /// Unix timestamp in nanoseconds
    #[serde(default)]
    pub timestamp: i64,

    /// Metric labels
    #[serde(default)]
    pub tags: Tags,

    /// Metric values keyed by field name
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,

    /// Owning organisation, resolved by receivers and never serialized
    #[serde(skip)]
    pub org_name: String,
}

impl Metric {
    /// Create a metric with the given name and no labels or fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
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

    /// Add a field value
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set the owning organisation
    pub fn with_org_name(mut self, org_name: impl Into<String>) -> Self {
        self.org_name = org_name.into();
        self
    }

    /// Copy of tags and fields; values are scalars so this is a full copy
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// FNV-1a over the sorted tag pairs followed by the name.
    ///
    /// Timestamp and fields are left out: this is the series identity used
    /// by aggregating processors.
    pub fn series_hash(&self) -> u64 {
        let mut keys: Vec<&String> = self.tags.keys().collect();
        keys.sort();

        let mut hash = Fnv1a::default();
        for key in keys {
            hash.write(key.as_bytes());
            hash.write(b"\n");
            hash.write(self.tags[key].as_bytes());
            hash.write(b"\n");
        }
        hash.write(self.name.as_bytes());
        hash.0
    }
}

/// 64-bit FNV-1a
struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self(0xcbf29ce484222325)
    }
}

impl Fnv1a {
    const PRIME: u64 = 0x100000001b3;

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }
}
