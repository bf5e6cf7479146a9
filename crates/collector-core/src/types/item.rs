//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! The `ObservableData` capability and the tagged union moved through pipelines.

use serde::{Deserialize, Serialize};

use super::{DataType, Log, Metric, Raw, Span, Tags, ORG_NAME_TAG};

/// Capability shared by every telemetry kind
pub trait ObservableData {
    /// Kind discriminator
    fn data_type(&self) -> DataType;

    /// Label set, `None` for kinds that carry no labels
    fn tags(&self) -> Option<&Tags>;

    /// Mutable label set, `None` for kinds that carry no labels
    fn tags_mut(&mut self) -> Option<&mut Tags>;

    /// Content fingerprint; `0` where deduplication is meaningless
    fn content_hash(&self) -> u64 {
        0
    }

    /// Owning organisation used as a metrics label, read from the `org_name` tag
    fn org_name(&self) -> &str {
        self.tags()
            .and_then(|tags| tags.get(ORG_NAME_TAG))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl ObservableData for Metric {
    fn data_type(&self) -> DataType {
        DataType::Metric
    }

    fn tags(&self) -> Option<&Tags> {
        Some(&self.tags)
    }

    fn tags_mut(&mut self) -> Option<&mut Tags> {
        Some(&mut self.tags)
    }

    fn content_hash(&self) -> u64 {
        self.series_hash()
    }

    fn org_name(&self) -> &str {
        if !self.org_name.is_empty() {
            return &self.org_name;
        }
        self.tags
            .get(ORG_NAME_TAG)
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl ObservableData for Log {
    fn data_type(&self) -> DataType {
        DataType::Log
    }

    fn tags(&self) -> Option<&Tags> {
        Some(&self.tags)
    }

    fn tags_mut(&mut self) -> Option<&mut Tags> {
        Some(&mut self.tags)
    }
}

impl ObservableData for Span {
    fn data_type(&self) -> DataType {
        DataType::Span
    }

    fn tags(&self) -> Option<&Tags> {
        Some(&self.attributes)
    }

    fn tags_mut(&mut self) -> Option<&mut Tags> {
        Some(&mut self.attributes)
    }
}

impl ObservableData for Raw {
    fn data_type(&self) -> DataType {
        DataType::Raw
    }

    fn tags(&self) -> Option<&Tags> {
        None
    }

    fn tags_mut(&mut self) -> Option<&mut Tags> {
        None
    }
}

/// One telemetry item of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum TelemetryItem {
    Metric(Metric),
    Log(Log),
    Span(Span),
    Raw(Raw),
}

impl TelemetryItem {
    /// Event time in nanoseconds, if the kind has one
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            TelemetryItem::Metric(m) => Some(m.timestamp),
            TelemetryItem::Log(l) => Some(l.timestamp),
            TelemetryItem::Span(s) => Some(s.start_time),
            TelemetryItem::Raw(_) => None,
        }
    }

    /// Set the event time to `now` when the producer left it at zero
    pub fn fill_timestamp(&mut self, now: i64) {
        let timestamp = match self {
            TelemetryItem::Metric(m) => &mut m.timestamp,
            TelemetryItem::Log(l) => &mut l.timestamp,
            TelemetryItem::Span(s) => &mut s.start_time,
            TelemetryItem::Raw(_) => return,
        };
        if *timestamp == 0 {
            *timestamp = now;
        }
    }
}

impl ObservableData for TelemetryItem {
    fn data_type(&self) -> DataType {
        match self {
            TelemetryItem::Metric(m) => m.data_type(),
            TelemetryItem::Log(l) => l.data_type(),
            TelemetryItem::Span(s) => s.data_type(),
            TelemetryItem::Raw(r) => r.data_type(),
        }
    }

    fn tags(&self) -> Option<&Tags> {
        match self {
            TelemetryItem::Metric(m) => m.tags(),
            TelemetryItem::Log(l) => l.tags(),
            TelemetryItem::Span(s) => s.tags(),
            TelemetryItem::Raw(r) => r.tags(),
        }
    }

    fn tags_mut(&mut self) -> Option<&mut Tags> {
        match self {
            TelemetryItem::Metric(m) => m.tags_mut(),
            TelemetryItem::Log(l) => l.tags_mut(),
            TelemetryItem::Span(s) => s.tags_mut(),
            TelemetryItem::Raw(r) => r.tags_mut(),
        }
    }

    fn content_hash(&self) -> u64 {
        match self {
            TelemetryItem::Metric(m) => m.content_hash(),
            TelemetryItem::Log(l) => l.content_hash(),
            TelemetryItem::Span(s) => s.content_hash(),
            TelemetryItem::Raw(r) => r.content_hash(),
        }
    }

    fn org_name(&self) -> &str {
        match self {
            TelemetryItem::Metric(m) => ObservableData::org_name(m),
            TelemetryItem::Log(l) => l.org_name(),
            TelemetryItem::Span(s) => s.org_name(),
            TelemetryItem::Raw(r) => r.org_name(),
        }
    }
}

impl From<Metric> for TelemetryItem {
    fn from(m: Metric) -> Self {
        TelemetryItem::Metric(m)
    }
}

impl From<Log> for TelemetryItem {
    fn from(l: Log) -> Self {
        TelemetryItem::Log(l)
    }
}

impl From<Span> for TelemetryItem {
    fn from(s: Span) -> Self {
        TelemetryItem::Span(s)
    }
}

impl From<Raw> for TelemetryItem {
    fn from(r: Raw) -> Self {
        TelemetryItem::Raw(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_dispatch() {
        let items: Vec<TelemetryItem> = vec![
            Metric::new("cpu").into(),
            Span::new("t", "s").into(),
            Log::new("line").into(),
            Raw::new("{}").into(),
        ];
        let kinds: Vec<DataType> = items.iter().map(|i| i.data_type()).collect();
        assert_eq!(kinds, DataType::ALL.to_vec());
    }

    #[test]
    fn test_fill_timestamp_only_when_unset() {
        let mut unset = TelemetryItem::from(Metric::new("cpu"));
        unset.fill_timestamp(42);
        assert_eq!(unset.timestamp(), Some(42));

        let mut set = TelemetryItem::from(Metric::new("cpu").with_timestamp(7));
        set.fill_timestamp(42);
        assert_eq!(set.timestamp(), Some(7));
    }

    #[test]
    fn test_raw_has_no_tags() {
        let mut item = TelemetryItem::from(Raw::new("{}"));
        assert!(item.tags().is_none());
        assert!(item.tags_mut().is_none());
        assert_eq!(item.content_hash(), 0);
    }

    #[test]
    fn test_log_hash_is_constant() {
        let a = TelemetryItem::from(Log::new("a").with_tag("k", "v"));
        let b = TelemetryItem::from(Log::new("b"));
        assert_eq!(a.content_hash(), 0);
        assert_eq!(b.content_hash(), 0);
    }

    #[test]
    fn test_org_name_resolution() {
        let metric = TelemetryItem::from(Metric::new("cpu").with_org_name("erda"));
        assert_eq!(metric.org_name(), "erda");

        let tagged = TelemetryItem::from(Metric::new("cpu").with_tag(ORG_NAME_TAG, "terminus"));
        assert_eq!(tagged.org_name(), "terminus");

        let log = TelemetryItem::from(Log::new("x").with_tag(ORG_NAME_TAG, "o1"));
        assert_eq!(log.org_name(), "o1");

        assert_eq!(TelemetryItem::from(Raw::new("{}")).org_name(), "");
    }

    #[test]
    fn test_tags_mutation_through_union() {
        let mut item = TelemetryItem::from(Span::new("t", "s"));
        if let Some(tags) = item.tags_mut() {
            tags.insert("service".to_string(), "api".to_string());
        }
        match item {
            TelemetryItem::Span(span) => {
                assert_eq!(span.attributes.get("service").map(String::as_str), Some("api"))
            }
            other => panic!("unexpected item {:?}", other),
        }
    }
}
