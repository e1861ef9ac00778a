//! Farm - Volume Records and Chart Datasets

use ahash::AHashSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request body for the farm volume endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmVolumesRequest {
    pub company_id: String,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

/// A single dated volume sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeSample {
    pub date: NaiveDate,
    pub value: f64,
}

/// One farm's volume as returned by the data endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmVolumeRecord {
    pub farm_id: String,
    pub farm_name: String,
    pub volume: f64,
    /// Optional dated history for the farm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<VolumeSample>>,
}

impl FarmVolumeRecord {
    pub fn new(farm_id: impl Into<String>, farm_name: impl Into<String>, volume: f64) -> Self {
        Self {
            farm_id: farm_id.into(),
            farm_name: farm_name.into(),
            volume,
            volumes: None,
        }
    }
}

/// Raw response envelope of the data endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmVolumesResponse {
    #[serde(default)]
    pub success: Option<bool>,
    /// Either `true` or an error string
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub data: Option<Vec<FarmVolumeRecord>>,
}

impl FarmVolumesResponse {
    /// Build a successful envelope
    pub fn ok(data: Vec<FarmVolumeRecord>) -> Self {
        Self {
            success: Some(true),
            data: Some(data),
            ..Default::default()
        }
    }

    /// Build an error envelope
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(serde_json::Value::Bool(true)),
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    fn flagged_error(&self) -> Option<Option<String>> {
        let from_flag = match &self.error {
            Some(serde_json::Value::Bool(true)) => Some(None),
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(Some(s.clone())),
            _ => None,
        };
        if from_flag.is_none() && self.success == Some(false) {
            return Some(self.error_message.clone());
        }
        from_flag.map(|msg| self.error_message.clone().or(msg))
    }

    /// Validate the envelope and return its records.
    ///
    /// Rejects application errors, empty data and records that break the
    /// per-response invariants (unique farm ids, finite non-negative volumes).
    pub fn into_records(self) -> Result<Vec<FarmVolumeRecord>> {
        if let Some(message) = self.flagged_error() {
            return Err(Error::Application { message });
        }

        let records = self.data.unwrap_or_default();
        if records.is_empty() {
            return Err(Error::EmptyResult);
        }

        let mut seen = AHashSet::with_capacity(records.len());
        for record in &records {
            if record.farm_id.is_empty() {
                return Err(Error::MalformedResponse {
                    message: "record without farmId".to_string(),
                });
            }
            if !seen.insert(record.farm_id.as_str()) {
                return Err(Error::MalformedResponse {
                    message: format!("duplicate farmId {}", record.farm_id),
                });
            }
            if !record.volume.is_finite() || record.volume < 0.0 {
                return Err(Error::MalformedResponse {
                    message: format!("invalid volume for farm {}", record.farm_id),
                });
            }
        }

        Ok(records)
    }
}

/// One farm in the chart dataset
#[derive(Debug, Clone, PartialEq)]
pub struct FarmSeries {
    pub id: String,
    pub name: String,
    /// Samples ordered by date
    pub volumes: Vec<VolumeSample>,
    /// Hex color `#RRGGBB`, stable for the session
    pub color: String,
}

impl FarmSeries {
    /// Build a series from a server record.
    ///
    /// Records without history get a single sample at the requested date.
    pub fn from_record(record: FarmVolumeRecord, date: NaiveDate, color: String) -> Self {
        let mut volumes = match record.volumes {
            Some(history) if !history.is_empty() => history,
            _ => vec![VolumeSample {
                date,
                value: record.volume,
            }],
        };
        volumes.sort_by_key(|s| s.date);

        Self {
            id: record.farm_id,
            name: record.farm_name,
            volumes,
            color,
        }
    }

    /// Most recent sample value
    pub fn latest_value(&self) -> f64 {
        self.volumes.last().map(|s| s.value).unwrap_or(0.0)
    }
}

/// Dataset rendered by a chart controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartDataset {
    pub farms: Vec<FarmSeries>,
}

impl ChartDataset {
    pub fn len(&self) -> usize {
        self.farms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.farms.is_empty()
    }

    /// True iff at least one farm has more than one dated sample
    pub fn has_multiple_dates_per_farm(&self) -> bool {
        self.farms.iter().any(|f| f.volumes.len() > 1)
    }

    /// Sum of each farm's latest value, in stored units
    pub fn total_volume(&self) -> f64 {
        self.farms.iter().map(FarmSeries::latest_value).sum()
    }

    pub fn farm(&self, farm_id: &str) -> Option<&FarmSeries> {
        self.farms.iter().find(|f| f.id == farm_id)
    }
}
