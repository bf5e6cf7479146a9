//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Filter configuration as declared on a component

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keep/drop selectors for a component. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Key path -> globs; an item that has the key must match one of them
    #[serde(default)]
    pub keypass: HashMap<String, Vec<String>>,

    /// Key path -> globs; an item that has the key must match none of them
    #[serde(default)]
    pub keydrop: HashMap<String, Vec<String>>,

    /// Key paths that must be present
    #[serde(default)]
    pub keyinclude: Vec<String>,

    /// Key paths that must be absent
    #[serde(default)]
    pub keyexclude: Vec<String>,
}

impl FilterConfig {
    /// True when no section constrains anything
    pub fn is_empty(&self) -> bool {
        self.keypass.values().all(Vec::is_empty)
            && self.keydrop.values().all(Vec::is_empty)
            && self.keyinclude.is_empty()
            && self.keyexclude.is_empty()
    }

    pub fn with_keypass<I, S>(mut self, key: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keypass
            .insert(key.into(), patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_keydrop<I, S>(mut self, key: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keydrop
            .insert(key.into(), patterns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_keyinclude(mut self, key: impl Into<String>) -> Self {
        self.keyinclude.push(key.into());
        self
    }

    pub fn with_keyexclude(mut self, key: impl Into<String>) -> Self {
        self.keyexclude.push(key.into());
        self
    }
}
