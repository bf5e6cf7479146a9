//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Compiled filter evaluated once per item per component
//!
//! Rules are checked in a fixed order and the first failing rule rejects:
//!
//! 1. `keypass`: key present and value matches none of its globs
//! 2. `keydrop`: key present and value matches one of its globs
//! 3. `keyinclude`: key absent
//! 4. `keyexclude`: key present
//!
//! A `keypass`/`keydrop` key that does not resolve on the item is skipped.
//! Globs follow shell rules: `*`, `?` and `[...]`, with no special meaning
//! for `.`, so `.*` only matches values starting with a dot.

use glob::Pattern;

use super::FilterConfig;
use crate::accessor::{get_key_value, FieldAddressable, KeyPath};
use crate::error::{CollectorError, CollectorResult};

/// Compiled glob set; a value matches when any pattern does
#[derive(Debug, Clone)]
struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    fn compile(key: &str, patterns: &[String]) -> CollectorResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    CollectorError::configuration_with_source(
                        format!("invalid pattern {:?} for key {:?}", p, key),
                        e,
                    )
                })
            })
            .collect::<CollectorResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    fn matches(&self, value: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(value))
    }
}

/// Immutable, lock-free after construction
#[derive(Debug, Clone, Default)]
pub struct DataFilter {
    keypass: Vec<(KeyPath, PatternSet)>,
    keydrop: Vec<(KeyPath, PatternSet)>,
    keyinclude: Vec<KeyPath>,
    keyexclude: Vec<KeyPath>,
}

impl DataFilter {
    /// Compile a filter; fails on the first invalid glob
    pub fn compile(config: &FilterConfig) -> CollectorResult<Self> {
        Ok(Self {
            keypass: Self::compile_selectors(&config.keypass)?,
            keydrop: Self::compile_selectors(&config.keydrop)?,
            keyinclude: config.keyinclude.iter().map(|k| KeyPath::parse(k)).collect(),
            keyexclude: config.keyexclude.iter().map(|k| KeyPath::parse(k)).collect(),
        })
    }

    fn compile_selectors(
        selectors: &std::collections::HashMap<String, Vec<String>>,
    ) -> CollectorResult<Vec<(KeyPath, PatternSet)>> {
        let mut compiled = Vec::with_capacity(selectors.len());
        for (key, patterns) in selectors {
            if patterns.is_empty() {
                continue;
            }
            compiled.push((KeyPath::parse(key), PatternSet::compile(key, patterns)?));
        }
        Ok(compiled)
    }

    /// A filter that accepts everything
    pub fn pass_all() -> Self {
        Self::default()
    }

    pub fn is_pass_all(&self) -> bool {
        self.keypass.is_empty()
            && self.keydrop.is_empty()
            && self.keyinclude.is_empty()
            && self.keyexclude.is_empty()
    }

    /// Whether `item` should flow into the component owning this filter
    pub fn selected<T>(&self, item: &T) -> bool
    where
        T: FieldAddressable + ?Sized,
    {
        for (key, set) in &self.keypass {
            if let Some(value) = get_key_value(item, key) {
                if !set.matches(&value.to_string()) {
                    return false;
                }
            }
        }

        for (key, set) in &self.keydrop {
            if let Some(value) = get_key_value(item, key) {
                if set.matches(&value.to_string()) {
                    return false;
                }
            }
        }

        if self
            .keyinclude
            .iter()
            .any(|key| get_key_value(item, key).is_none())
        {
            return false;
        }

        if self
            .keyexclude
            .iter()
            .any(|key| get_key_value(item, key).is_some())
        {
            return false;
        }

        true
    }
}
