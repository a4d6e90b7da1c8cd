//! Domain models for geo-indexed data rows.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationError;

/// Geographic granularity of a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BoundaryType {
    Zip,
    County,
}

impl BoundaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryType::Zip => "ZIP",
            BoundaryType::County => "COUNTY",
        }
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ZIP" => Ok(BoundaryType::Zip),
            "COUNTY" => Ok(BoundaryType::County),
            other => Err(ValidationError::UnknownBoundaryType(other.to_string())),
        }
    }
}

/// Area-code keyed values for one statistic, boundary type, and date.
///
/// `data` is always normalized: every value is a finite f64. Raw payloads
/// from the census fetch go through [`normalize_area_values`] first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDataRow {
    pub stat_id: String,
    pub boundary_type: BoundaryType,
    /// A single year ("2023") or a range ("2020-2023") for change rows.
    pub date: String,
    /// Semantic unit, one of the `DATA_TYPE_*` constants.
    pub data_type: String,
    pub data: HashMap<String, f64>,
    pub source: String,
    pub created_on: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl AreaDataRow {
    pub fn new(
        stat_id: impl Into<String>,
        boundary_type: BoundaryType,
        date: impl Into<String>,
        data_type: impl Into<String>,
        data: HashMap<String, f64>,
        source: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            stat_id: stat_id.into(),
            boundary_type,
            date: date.into(),
            data_type: data_type.into(),
            data,
            source: source.into(),
            created_on: now,
            last_updated: now,
        }
    }

    /// Context string for the owning summary's natural key. Two rows with
    /// the same stat, boundary, date, and unit describe the same context and
    /// must upsert the same summary.
    pub fn context(&self) -> String {
        format!("{}::{}", self.date, self.data_type)
    }
}

/// Normalize a raw area→value payload into a finite value map.
///
/// Non-numeric entries and non-finite numbers (NaN, ±∞, census sentinel
/// strings) are dropped rather than propagated.
pub fn normalize_area_values(raw: &serde_json::Map<String, Value>) -> HashMap<String, f64> {
    raw.iter()
        .filter_map(|(area, value)| {
            let number = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            number
                .filter(|n| n.is_finite())
                .map(|n| (area.clone(), n))
        })
        .collect()
}
