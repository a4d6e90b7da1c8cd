//! Domain models for parent-child statistic relations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::RELATION_ATTRIBUTE_SENTINEL;

/// A parent→child edge between two statistics, qualified by a free-text
/// attribute label (e.g., "percent", "change").
///
/// Relations are addressed by their natural key rather than a generated id
/// so that re-imports upsert instead of duplicating edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub parent_id: String,
    pub child_id: String,
    pub attribute: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Relation {
    pub fn new(
        parent_id: impl Into<String>,
        child_id: impl Into<String>,
        attribute: Option<String>,
        sort_order: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
            attribute,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Deterministic key `parentId::childId::attribute`.
    ///
    /// Attribute-less edges use the stored sentinel so keys stay stable
    /// against rows written before attributes existed.
    pub fn natural_key(&self) -> String {
        relation_key(
            &self.parent_id,
            &self.child_id,
            self.attribute.as_deref(),
        )
    }

    pub fn attribute_or_sentinel(&self) -> &str {
        self.attribute.as_deref().unwrap_or(RELATION_ATTRIBUTE_SENTINEL)
    }
}

/// Build the natural key for a (parent, child, attribute) triple.
pub fn relation_key(parent_id: &str, child_id: &str, attribute: Option<&str>) -> String {
    format!(
        "{}::{}::{}",
        parent_id,
        child_id,
        attribute.unwrap_or(RELATION_ATTRIBUTE_SENTINEL)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_key_includes_attribute() {
        let relation = Relation::new("p1", "c1", Some("percent".to_string()), 0);
        assert_eq!(relation.natural_key(), "p1::c1::percent");
    }

    #[test]
    fn test_natural_key_uses_sentinel_without_attribute() {
        let relation = Relation::new("p1", "c1", None, 0);
        assert_eq!(relation.natural_key(), "p1::c1::undefined");
    }

    #[test]
    fn test_same_fields_same_key() {
        let a = Relation::new("p1", "c1", Some("rate".to_string()), 0);
        let b = Relation::new("p1", "c1", Some("rate".to_string()), 7);
        assert_eq!(a.natural_key(), b.natural_key());
    }
}
