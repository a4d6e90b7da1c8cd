//! Domain models for materialized data summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::area_data::{AreaDataRow, BoundaryType};
use crate::formulas::SummaryStats;

/// Materialized aggregate of one data row's value map.
///
/// Keyed by a deterministic natural key so repeated writes for the same
/// context upsert instead of accumulating duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatDataSummary {
    pub stat_id: String,
    pub boundary_type: BoundaryType,
    /// `date::dataType` of the summarized row.
    pub context: String,
    pub count: u64,
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl StatDataSummary {
    /// Deterministic key `statId::boundaryType::context`.
    pub fn natural_key(&self) -> String {
        summary_key(&self.stat_id, self.boundary_type, &self.context)
    }

    /// Build a summary for a row from its computed aggregate.
    pub fn for_row(row: &AreaDataRow, stats: SummaryStats) -> Self {
        let (min_date, max_date) = split_date_range(&row.date);
        Self {
            stat_id: row.stat_id.clone(),
            boundary_type: row.boundary_type,
            context: row.context(),
            count: stats.count,
            sum: stats.sum,
            avg: stats.avg,
            min: stats.min,
            max: stats.max,
            min_date,
            max_date,
            updated_at: Utc::now(),
        }
    }
}

/// Build the natural key for a (statId, boundaryType, context) triple.
pub fn summary_key(stat_id: &str, boundary_type: BoundaryType, context: &str) -> String {
    format!("{}::{}::{}", stat_id, boundary_type.as_str(), context)
}

/// Split a row date into (minDate, maxDate). Range dates like "2020-2023"
/// yield both endpoints; single dates yield the same value twice; empty
/// dates yield neither.
fn split_date_range(date: &str) -> (Option<String>, Option<String>) {
    let date = date.trim();
    if date.is_empty() {
        return (None, None);
    }
    match date.split_once('-') {
        Some((start, end)) if !start.is_empty() && !end.is_empty() => {
            (Some(start.to_string()), Some(end.to_string()))
        }
        _ => (Some(date.to_string()), Some(date.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::formulas::compute_summary_from_data;

    fn row(date: &str) -> AreaDataRow {
        let mut data = HashMap::new();
        data.insert("90210".to_string(), 5.0);
        data.insert("90211".to_string(), 15.0);
        AreaDataRow::new("stat-1", BoundaryType::Zip, date, "count", data, "acs")
    }

    #[test]
    fn test_natural_key_is_deterministic() {
        let row = row("2023");
        let summary = StatDataSummary::for_row(&row, compute_summary_from_data(&row.data));
        assert_eq!(summary.natural_key(), "stat-1::ZIP::2023::count");

        let again = StatDataSummary::for_row(&row, compute_summary_from_data(&row.data));
        assert_eq!(summary.natural_key(), again.natural_key());
    }

    #[test]
    fn test_for_row_single_date() {
        let row = row("2023");
        let summary = StatDataSummary::for_row(&row, compute_summary_from_data(&row.data));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.sum, 20.0);
        assert_eq!(summary.min_date.as_deref(), Some("2023"));
        assert_eq!(summary.max_date.as_deref(), Some("2023"));
    }

    #[test]
    fn test_for_row_range_date() {
        let row = row("2020-2023");
        let summary = StatDataSummary::for_row(&row, compute_summary_from_data(&row.data));
        assert_eq!(summary.min_date.as_deref(), Some("2020"));
        assert_eq!(summary.max_date.as_deref(), Some("2023"));
    }
}
