//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Rule based modifier processor
//!
//! Rewrites tags, metric fields and metric names through the field accessor.
//! Rules run in declaration order against every kind; a rule whose key does
//! not resolve on an item is a no-op for that item. Items are never dropped.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{delete_key_value, get_key_value, set_key_value, FieldAddressable, KeyPath};
use crate::error::{CollectorError, CollectorResult};
use crate::filter::FilterConfig;
use crate::traits::{ComponentConfig, Processor};
use crate::types::{FieldValue, Log, Metric, Raw, Span};

/// Modifier actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierAction {
    /// Set `key` to `value` when it is not already present
    Add,
    /// Set `key` to `value` unconditionally
    Set,
    /// Remove `key`
    Drop,
    /// Move the value of `key` to `rename`
    Rename,
    /// Copy the value of `key` to `rename`
    Copy,
    /// Strip the prefix `key` from every tag key that starts with it
    TrimPrefix,
    /// Match the pattern in `value` against `key`; named captures become tags
    Regex,
}

/// A single modifier rule as declared in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierRule {
    pub action: ModifierAction,

    pub key: String,

    #[serde(default)]
    pub value: Option<FieldValue>,

    #[serde(default)]
    pub rename: Option<String>,
}

impl ModifierRule {
    pub fn new(action: ModifierAction, key: impl Into<String>) -> Self {
        Self {
            action,
            key: key.into(),
            value: None,
            rename: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }
}

/// Modifier processor configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierConfig {
    pub rules: Vec<ModifierRule>,

    pub filter: FilterConfig,
}

#[derive(Debug, Clone)]
enum Operation {
    Add(KeyPath, FieldValue),
    Set(KeyPath, FieldValue),
    Drop(KeyPath),
    Rename(KeyPath, KeyPath),
    Copy(KeyPath, KeyPath),
    TrimPrefix(String),
    Regex(KeyPath, Regex),
}

impl Operation {
    fn compile(rule: &ModifierRule) -> CollectorResult<Self> {
        let key = KeyPath::parse(&rule.key);
        let value = || {
            rule.value.clone().ok_or_else(|| {
                CollectorError::configuration(format!(
                    "modifier rule {:?} on {} requires a value",
                    rule.action, rule.key
                ))
            })
        };
        let target = || {
            rule.rename.as_deref().map(KeyPath::parse).ok_or_else(|| {
                CollectorError::configuration(format!(
                    "modifier rule {:?} on {} requires a rename target",
                    rule.action, rule.key
                ))
            })
        };

        let op = match rule.action {
            ModifierAction::Add => Operation::Add(key, value()?),
            ModifierAction::Set => Operation::Set(key, value()?),
            ModifierAction::Drop => Operation::Drop(key),
            ModifierAction::Rename => Operation::Rename(key, target()?),
            ModifierAction::Copy => Operation::Copy(key, target()?),
            ModifierAction::TrimPrefix => {
                if rule.key.is_empty() {
                    return Err(CollectorError::configuration(
                        "trim_prefix rule requires a non-empty prefix",
                    ));
                }
                Operation::TrimPrefix(rule.key.clone())
            }
            ModifierAction::Regex => {
                let pattern = value()?;
                let pattern = pattern.as_str().ok_or_else(|| {
                    CollectorError::configuration(format!(
                        "regex rule on {} requires a string pattern",
                        rule.key
                    ))
                })?;
                let regex = Regex::new(pattern).map_err(|e| {
                    CollectorError::configuration_with_source(
                        format!("invalid regex for key {}", rule.key),
                        e,
                    )
                })?;
                Operation::Regex(key, regex)
            }
        };
        Ok(op)
    }

    fn apply<T: FieldAddressable + ?Sized>(&self, item: &mut T) {
        match self {
            Operation::Add(key, value) => {
                if get_key_value(item, key).is_none() {
                    set_key_value(item, key, value.clone());
                }
            }
            Operation::Set(key, value) => set_key_value(item, key, value.clone()),
            Operation::Drop(key) => delete_key_value(item, key),
            Operation::Rename(from, to) => {
                if let Some(value) = get_key_value(item, from) {
                    delete_key_value(item, from);
                    set_key_value(item, to, value);
                }
            }
            Operation::Copy(from, to) => {
                if let Some(value) = get_key_value(item, from) {
                    set_key_value(item, to, value);
                }
            }
            Operation::TrimPrefix(prefix) => {
                if let Some(tags) = item.tags_mut() {
                    let mut matching: Vec<String> = tags
                        .keys()
                        .filter(|k| k.starts_with(prefix.as_str()) && k.len() > prefix.len())
                        .cloned()
                        .collect();
                    matching.sort_unstable();
                    for key in matching {
                        let target = &key[prefix.len()..];
                        if tags.contains_key(target) {
                            debug!(tag = %key, trimmed = %target, "Trimmed tag key already present, keeping original");
                            continue;
                        }
                        if let Some(value) = tags.remove(&key) {
                            tags.insert(target.to_string(), value);
                        }
                    }
                }
            }
            Operation::Regex(key, regex) => {
                let Some(value) = get_key_value(item, key) else {
                    return;
                };
                let text = value.to_string();
                let Some(captures) = regex.captures(&text) else {
                    return;
                };
                let Some(tags) = item.tags_mut() else {
                    return;
                };
                for name in regex.capture_names().flatten() {
                    if let Some(m) = captures.name(name) {
                        tags.insert(name.to_string(), m.as_str().to_string());
                    }
                }
            }
        }
    }
}

/// Processor applying an ordered list of [`ModifierRule`]s
#[derive(Debug, Clone)]
pub struct ModifierProcessor {
    config: ModifierConfig,
    operations: Vec<Operation>,
}

impl ModifierProcessor {
    /// Compile the rules; fails on a rule missing its operand or a bad regex
    pub fn new(config: ModifierConfig) -> CollectorResult<Self> {
        let operations = config
            .rules
            .iter()
            .map(Operation::compile)
            .collect::<CollectorResult<Vec<_>>>()?;
        Ok(Self { config, operations })
    }

    /// Build from component options, e.g. the `options` table of a config entry
    pub fn from_options(options: &serde_json::Value) -> CollectorResult<Self> {
        let config: ModifierConfig = serde_json::from_value(options.clone()).map_err(|e| {
            CollectorError::configuration_with_source("invalid modifier options", e)
        })?;
        Self::new(config)
    }

    pub fn rules(&self) -> &[ModifierRule] {
        &self.config.rules
    }

    /// Apply every rule to `item` in declaration order
    pub fn modify<T: FieldAddressable + ?Sized>(&self, item: &mut T) {
        for op in &self.operations {
            op.apply(item);
        }
    }
}

#[async_trait]
impl Processor for ModifierProcessor {
    async fn process_metric(&self, mut item: Metric) -> CollectorResult<Option<Metric>> {
        self.modify(&mut item);
        Ok(Some(item))
    }

    async fn process_log(&self, mut item: Log) -> CollectorResult<Option<Log>> {
        self.modify(&mut item);
        Ok(Some(item))
    }

    async fn process_span(&self, mut item: Span) -> CollectorResult<Option<Span>> {
        self.modify(&mut item);
        Ok(Some(item))
    }

    async fn process_raw(&self, item: Raw) -> CollectorResult<Option<Raw>> {
        debug!("raw payloads carry no addressable keys, passing through");
        Ok(Some(item))
    }

    fn component_config(&self) -> ComponentConfig {
        ComponentConfig::with_filter(self.config.filter.clone())
    }
}
