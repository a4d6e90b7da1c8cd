//! Domain models for statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who can see a statistic on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Inactive,
    /// Resolved from the parent statistic at read time. Children linked by
    /// the import queue are reset to this so a parent-level change
    /// propagates.
    Inherited,
}

/// A named statistic: one node in the relationship graph.
///
/// Created by import or derivation, mutated by edit, deleted only through
/// the orphan cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    pub id: String,
    pub name: String,
    pub label: String,
    pub category: String,
    pub source: String,
    /// Tri-state: Some(true) = an increase is good, Some(false) = bad,
    /// None = direction has no valence (e.g., median age).
    pub good_if_up: Option<bool>,
    pub visibility: Visibility,
    pub created_by: String,
    pub created_on: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Data for creating a new statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStatistic {
    pub id: Option<String>,
    pub name: String,
    pub label: String,
    pub category: String,
    pub source: String,
    pub good_if_up: Option<bool>,
    pub visibility: Visibility,
    pub created_by: String,
}

impl NewStatistic {
    /// Materialize into a full record, generating an id when none was given.
    pub fn into_statistic(self, now: DateTime<Utc>) -> Statistic {
        Statistic {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            label: self.label,
            category: self.category,
            source: self.source,
            good_if_up: self.good_if_up,
            visibility: self.visibility,
            created_by: self.created_by,
            created_on: now,
            last_updated: now,
        }
    }
}

/// Outcome of a cascade delete: which statistics were removed and which
/// relation keys were merely unlinked because the child survives elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeDeleteResult {
    pub deleted_stat_ids: Vec<String>,
    pub unlinked_relation_keys: Vec<String>,
}

/// Partial edit of an existing statistic. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticUpdate {
    pub name: Option<String>,
    pub label: Option<String>,
    pub category: Option<String>,
    pub good_if_up: Option<Option<bool>>,
    pub visibility: Option<Visibility>,
}

impl StatisticUpdate {
    pub fn apply(self, mut stat: Statistic, now: DateTime<Utc>) -> Statistic {
        if let Some(name) = self.name {
            stat.name = name;
        }
        if let Some(label) = self.label {
            stat.label = label;
        }
        if let Some(category) = self.category {
            stat.category = category;
        }
        if let Some(good_if_up) = self.good_if_up {
            stat.good_if_up = good_if_up;
        }
        if let Some(visibility) = self.visibility {
            stat.visibility = visibility;
        }
        stat.last_updated = now;
        stat
    }
}
