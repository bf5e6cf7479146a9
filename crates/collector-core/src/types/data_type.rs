//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Discriminator for the telemetry kinds a pipeline can carry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CollectorError;

/// Telemetry kind; a pipeline is bound to exactly one for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[serde(alias = "METRIC", alias = "metrics")]
    Metric,
    #[serde(alias = "SPAN", alias = "spans")]
    Span,
    #[serde(alias = "LOG", alias = "logs")]
    Log,
    #[serde(alias = "RAW")]
    Raw,
}

impl DataType {
    /// All kinds, in declaration order
    pub const ALL: [DataType; 4] = [DataType::Metric, DataType::Span, DataType::Log, DataType::Raw];

    /// Lowercase label used in logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Metric => "metric",
            DataType::Span => "span",
            DataType::Log => "log",
            DataType::Raw => "raw",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "metric" | "metrics" => Ok(DataType::Metric),
            "span" | "spans" => Ok(DataType::Span),
            "log" | "logs" => Ok(DataType::Log),
            "raw" => Ok(DataType::Raw),
            other => Err(CollectorError::configuration(format!(
                "unknown data type: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_type() {
        assert_eq!("METRIC".parse::<DataType>().unwrap(), DataType::Metric);
        assert_eq!("logs".parse::<DataType>().unwrap(), DataType::Log);
        assert!("events".parse::<DataType>().is_err());
    }

    #[test]
    fn test_data_type_serde() {
        let parsed: DataType = serde_json::from_str("\"SPAN\"").unwrap();
        assert_eq!(parsed, DataType::Span);
        assert_eq!(serde_json::to_string(&DataType::Raw).unwrap(), "\"raw\"");
    }
}
