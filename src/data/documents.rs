//! Metadata and analysis documents stored with a dataset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ScientificValue, Time, ValueRange};

/// Measurement technique.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TasType {
    #[default]
    #[serde(rename = "not-specified")]
    NotSpecified,
    #[serde(rename = "us-tas")]
    MicroSecond,
    #[serde(rename = "fs-tas")]
    FemtoSecond,
}

impl TasType {
    pub fn display_name(self) -> &'static str {
        match self {
            TasType::NotSpecified => "not specified",
            TasType::MicroSecond => "µs-TAS",
            TasType::FemtoSecond => "fs-TAS",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommonMetadata {
    #[serde(rename = "type")]
    pub tas_type: TasType,
    pub sample_name: Option<String>,
    #[serde(default)]
    pub comment: String,
    /// When the dataset was assembled from raw files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommonAnalysis {
    /// Time windows selected for spectra display and export.
    #[serde(default)]
    pub spectra_ranges: Vec<ValueRange<Time>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MicroSecondAnalysis {
    pub t0: ScientificValue<Time>,
    /// Channels whose probe peak contributed to the detected t0; absent when
    /// t0 came from a custom strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t0_channels: Option<usize>,
}

impl Default for MicroSecondAnalysis {
    fn default() -> Self {
        Self {
            t0: ScientificValue::new(Time::ZERO),
            t0_channels: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_json_shape() {
        let meta = CommonMetadata {
            tas_type: TasType::MicroSecond,
            sample_name: Some("TiO2".into()),
            comment: String::new(),
            created: None,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"type":"us-tas","sample-name":"TiO2","comment":""}"#);
        let back: CommonMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn analysis_round_trip() {
        let analysis = CommonAnalysis {
            spectra_ranges: vec![ValueRange::new(Time::new(1e-6), Time::new(2e-6))],
        };
        let json = serde_json::to_string(&analysis).unwrap();
        assert!(json.contains(r#""start":"1 us""#));
        let back: CommonAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);

        let mut us = MicroSecondAnalysis { t0: ScientificValue::new(Time::new(2.5e-6)), t0_channels: None };
        assert_eq!(serde_json::to_string(&us).unwrap(), r#"{"t0":"2.5 us"}"#);
        us.t0_channels = Some(7);
        assert_eq!(serde_json::to_string(&us).unwrap(), r#"{"t0":"2.5 us","t0-channels":7}"#);
    }
}
