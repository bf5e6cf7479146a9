//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Dotted-key field access over every telemetry kind
//!
//! Keys address a value on an item:
//!
//! - `tags.<key>` reads or writes the label set of any kind that has one
//! - `fields.<key>` reads or writes a metric field
//! - `name` reads or writes the metric name
//!
//! Paths that do not apply to an item resolve to "not found" on read and are
//! ignored on write or delete. A single rule set can therefore run against a
//! stream mixing kinds without per-kind branching in the rules themselves.
//! Kinds opt into `fields.*` and `name` by overriding [`FieldAddressable`].

use std::fmt;

use crate::types::{FieldValue, Log, Metric, ObservableData, Raw, Span, TelemetryItem};

const TAGS_PREFIX: &str = "tags.";
const FIELDS_PREFIX: &str = "fields.";
const NAME_KEY: &str = "name";

/// A parsed key path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPath {
    Tag(String),
    Field(String),
    Name,
    Unknown(String),
}

impl KeyPath {
    pub fn parse(key: &str) -> Self {
        if let Some(tag) = key.strip_prefix(TAGS_PREFIX) {
            if !tag.is_empty() {
                return KeyPath::Tag(tag.to_string());
            }
        } else if let Some(field) = key.strip_prefix(FIELDS_PREFIX) {
            if !field.is_empty() {
                return KeyPath::Field(field.to_string());
            }
        } else if key == NAME_KEY {
            return KeyPath::Name;
        }
        KeyPath::Unknown(key.to_string())
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        KeyPath::parse(key)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPath::Tag(k) => write!(f, "{}{}", TAGS_PREFIX, k),
            KeyPath::Field(k) => write!(f, "{}{}", FIELDS_PREFIX, k),
            KeyPath::Name => f.write_str(NAME_KEY),
            KeyPath::Unknown(k) => f.write_str(k),
        }
    }
}

/// Per-kind hooks for the non-tag paths. Defaults are soft no-ops.
pub trait FieldAddressable: ObservableData {
    fn field(&self, _key: &str) -> Option<&FieldValue> {
        None
    }

    fn set_field(&mut self, _key: &str, _value: FieldValue) {}

    fn delete_field(&mut self, _key: &str) {}

    fn name(&self) -> Option<&str> {
        None
    }

    fn set_name(&mut self, _name: String) {}
}

impl FieldAddressable for Metric {
    fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    fn set_field(&mut self, key: &str, value: FieldValue) {
        self.fields.insert(key.to_string(), value);
    }

    fn delete_field(&mut self, key: &str) {
        self.fields.remove(key);
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl FieldAddressable for Log {}

impl FieldAddressable for Span {}

impl FieldAddressable for Raw {}

impl FieldAddressable for TelemetryItem {
    fn field(&self, key: &str) -> Option<&FieldValue> {
        match self {
            TelemetryItem::Metric(m) => m.field(key),
            TelemetryItem::Log(l) => l.field(key),
            TelemetryItem::Span(s) => s.field(key),
            TelemetryItem::Raw(r) => r.field(key),
        }
    }

    fn set_field(&mut self, key: &str, value: FieldValue) {
        match self {
            TelemetryItem::Metric(m) => m.set_field(key, value),
            TelemetryItem::Log(l) => l.set_field(key, value),
            TelemetryItem::Span(s) => s.set_field(key, value),
            TelemetryItem::Raw(r) => r.set_field(key, value),
        }
    }

    fn delete_field(&mut self, key: &str) {
        match self {
            TelemetryItem::Metric(m) => m.delete_field(key),
            TelemetryItem::Log(l) => l.delete_field(key),
            TelemetryItem::Span(s) => s.delete_field(key),
            TelemetryItem::Raw(r) => r.delete_field(key),
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            TelemetryItem::Metric(m) => FieldAddressable::name(m),
            TelemetryItem::Log(l) => FieldAddressable::name(l),
            TelemetryItem::Span(s) => FieldAddressable::name(s),
            TelemetryItem::Raw(r) => FieldAddressable::name(r),
        }
    }

    fn set_name(&mut self, name: String) {
        match self {
            TelemetryItem::Metric(m) => m.set_name(name),
            TelemetryItem::Log(l) => l.set_name(name),
            TelemetryItem::Span(s) => s.set_name(name),
            TelemetryItem::Raw(r) => r.set_name(name),
        }
    }
}

/// Read the value at `path`, `None` when the path does not resolve
pub fn get_key_value<T>(item: &T, path: &KeyPath) -> Option<FieldValue>
where
    T: FieldAddressable + ?Sized,
{
    match path {
        KeyPath::Tag(key) => item
            .tags()
            .and_then(|tags| tags.get(key))
            .map(|v| FieldValue::String(v.clone())),
        KeyPath::Field(key) => item.field(key).cloned(),
        KeyPath::Name => item.name().map(|n| FieldValue::String(n.to_string())),
        KeyPath::Unknown(_) => None,
    }
}

/// Write `value` at `path`; tags store the value's string form
pub fn set_key_value<T>(item: &mut T, path: &KeyPath, value: FieldValue)
where
    T: FieldAddressable + ?Sized,
{
    match path {
        KeyPath::Tag(key) => {
            if let Some(tags) = item.tags_mut() {
                tags.insert(key.clone(), value.to_string());
            }
        }
        KeyPath::Field(key) => item.set_field(key, value),
        KeyPath::Name => item.set_name(value.to_string()),
        KeyPath::Unknown(_) => {}
    }
}

/// Remove the value at `path`. The metric name cannot be removed.
pub fn delete_key_value<T>(item: &mut T, path: &KeyPath)
where
    T: FieldAddressable + ?Sized,
{
    match path {
        KeyPath::Tag(key) => {
            if let Some(tags) = item.tags_mut() {
                tags.remove(key);
            }
        }
        KeyPath::Field(key) => item.delete_field(key),
        KeyPath::Name | KeyPath::Unknown(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric() -> TelemetryItem {
        Metric::new("cpu")
            .with_tag("host", "h1")
            .with_field("usage", 1)
            .into()
    }

    #[test]
    fn test_parse_key_paths() {
        assert_eq!(KeyPath::parse("tags.host"), KeyPath::Tag("host".to_string()));
        assert_eq!(KeyPath::parse("fields.a.b"), KeyPath::Field("a.b".to_string()));
        assert_eq!(KeyPath::parse("name"), KeyPath::Name);
        assert_eq!(KeyPath::parse("tags."), KeyPath::Unknown("tags.".to_string()));
        assert_eq!(KeyPath::parse("abc"), KeyPath::Unknown("abc".to_string()));
        assert_eq!(KeyPath::parse("tags.host").to_string(), "tags.host");
    }

    #[test]
    fn test_get_metric_paths() {
        let item = metric();
        assert_eq!(get_key_value(&item, &"name".into()), Some(FieldValue::from("cpu")));
        assert_eq!(get_key_value(&item, &"tags.host".into()), Some(FieldValue::from("h1")));
        assert_eq!(get_key_value(&item, &"fields.usage".into()), Some(FieldValue::Int(1)));
        assert_eq!(get_key_value(&item, &"fields.missing".into()), None);
        assert_eq!(get_key_value(&item, &"abc".into()), None);
    }

    #[test]
    fn test_set_and_delete_metric_paths() {
        let mut item = metric();
        set_key_value(&mut item, &"tags.zone".into(), FieldValue::from(3));
        set_key_value(&mut item, &"fields.load".into(), FieldValue::from(0.5));
        set_key_value(&mut item, &"name".into(), FieldValue::from("cpu_v2"));
        assert_eq!(get_key_value(&item, &"tags.zone".into()), Some(FieldValue::from("3")));
        assert_eq!(get_key_value(&item, &"fields.load".into()), Some(FieldValue::Float(0.5)));
        assert_eq!(get_key_value(&item, &"name".into()), Some(FieldValue::from("cpu_v2")));

        delete_key_value(&mut item, &"tags.host".into());
        delete_key_value(&mut item, &"fields.usage".into());
        delete_key_value(&mut item, &"name".into());
        assert_eq!(get_key_value(&item, &"tags.host".into()), None);
        assert_eq!(get_key_value(&item, &"fields.usage".into()), None);
        assert_eq!(get_key_value(&item, &"name".into()), Some(FieldValue::from("cpu_v2")));
    }

    #[test]
    fn test_non_metric_kinds_soft_fail() {
        let mut log: TelemetryItem = Log::new("line").with_tag("level", "info").into();
        assert_eq!(get_key_value(&log, &"tags.level".into()), Some(FieldValue::from("info")));
        assert_eq!(get_key_value(&log, &"name".into()), None);

        set_key_value(&mut log, &"fields.x".into(), FieldValue::from(1));
        set_key_value(&mut log, &"name".into(), FieldValue::from("n"));
        assert_eq!(get_key_value(&log, &"fields.x".into()), None);
        assert_eq!(log, TelemetryItem::from(Log::new("line").with_tag("level", "info")));
    }

    #[test]
    fn test_raw_resolves_nothing() {
        let mut raw: TelemetryItem = Raw::new(r#"{"name":"x"}"#).into();
        set_key_value(&mut raw, &"tags.a".into(), FieldValue::from("b"));
        assert_eq!(get_key_value(&raw, &"tags.a".into()), None);
        assert_eq!(get_key_value(&raw, &"name".into()), None);
    }

    #[test]
    fn test_span_attributes_are_tags() {
        let mut span: TelemetryItem = Span::new("t", "s").with_attribute("http.method", "GET").into();
        assert_eq!(
            get_key_value(&span, &"tags.http.method".into()),
            Some(FieldValue::from("GET"))
        );
        delete_key_value(&mut span, &"tags.http.method".into());
        assert_eq!(get_key_value(&span, &"tags.http.method".into()), None);
    }
}
