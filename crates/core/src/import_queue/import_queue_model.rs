//! Domain models for the import queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::statistics::Visibility;

/// Per-item lifecycle. `Success` and `Error` are terminal; an item is never
/// removed from the queue mid-drain, only replaced or cleared on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Pending,
    Running,
    Success,
    Error,
}

/// Role the imported statistic plays when edges are wired after the drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueRelationship {
    None,
    Child,
    Parent,
}

/// Derived child requested alongside a base import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DerivedChildRequest {
    /// Child rows are the parent's values divided by another statistic's
    /// values, matched per boundary type and date.
    Percent { denominator_stat_id: String },
    /// Child rows are the relative change between the earliest and latest
    /// imported year, per boundary type.
    ChangeOverTime,
}

impl DerivedChildRequest {
    /// Attribute used for the parent→child relation when the item carries
    /// no explicit one.
    pub fn default_attribute(&self) -> &'static str {
        match self {
            DerivedChildRequest::Percent { .. } => "percent",
            DerivedChildRequest::ChangeOverTime => "change",
        }
    }
}

/// One queued import: a census variable and the span of years to pull.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportQueueItem {
    pub id: String,
    pub dataset: String,
    pub group: String,
    pub variable: String,
    /// Most recent year to fetch.
    pub year: i32,
    /// Number of years to fetch, descending from `year`.
    pub years: u32,
    pub relationship: QueueRelationship,
    pub stat_attribute: Option<String>,
    pub derived_child: Option<DerivedChildRequest>,
    pub status: ImportStatus,
    pub imported_stat_id: Option<String>,
    pub error_message: Option<String>,
}

impl ImportQueueItem {
    pub fn new(
        dataset: impl Into<String>,
        group: impl Into<String>,
        variable: impl Into<String>,
        year: i32,
        years: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            dataset: dataset.into(),
            group: group.into(),
            variable: variable.into(),
            year,
            years: years.max(1),
            relationship: QueueRelationship::None,
            stat_attribute: None,
            derived_child: None,
            status: ImportStatus::Pending,
            imported_stat_id: None,
            error_message: None,
        }
    }

    pub fn with_relationship(mut self, relationship: QueueRelationship) -> Self {
        self.relationship = relationship;
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.stat_attribute = Some(attribute.into());
        self
    }

    pub fn with_derived_child(mut self, request: DerivedChildRequest) -> Self {
        self.derived_child = Some(request);
        self
    }

    /// Years to fetch, strictly descending from `year`.
    pub fn year_span(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.years as i32).map(move |offset| self.year - offset)
    }
}

/// Caller-supplied metadata applied to statistics created by a drain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    pub category: String,
    pub visibility: Visibility,
    pub created_by: String,
}

/// Result of one successful fetch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedImport {
    pub stat_id: String,
}

/// Options for one drain pass.
#[derive(Debug, Clone, Default)]
pub struct DrainOptions {
    /// Explicit parent choice; takes priority over any queue item marked
    /// [`QueueRelationship::Parent`].
    pub parent_stat_id: Option<String>,
}

/// What a `drain` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Another drain was already in flight; this call did nothing.
    AlreadyRunning,
    Completed(DrainSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub relations_linked: usize,
}

/// A fetch that timed out after a write may already have landed. Not
/// auto-retried; the caller dismisses it once reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationJob {
    pub id: String,
    pub item_id: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ReconciliationJob {
    pub fn new(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}
