//! Traits for relation repository and service.

use async_trait::async_trait;

use super::{Relation, RelationshipGraph};
use crate::Result;

/// Repository trait for relation point reads. Writes go through the
/// [`DataStoreTrait`](crate::store::DataStoreTrait) as batched operations.
#[async_trait]
pub trait RelationRepositoryTrait: Send + Sync {
    fn get_relations(&self) -> Result<Vec<Relation>>;
    fn get_relations_for_parent(&self, parent_id: &str) -> Result<Vec<Relation>>;
    fn find_by_key(&self, natural_key: &str) -> Result<Option<Relation>>;
}

/// Service trait for relationship business logic.
#[async_trait]
pub trait RelationshipServiceTrait: Send + Sync {
    /// Build the in-memory graph from the stored edge set.
    fn load_graph(&self) -> Result<RelationshipGraph>;

    fn has_descendant(&self, ancestor_id: &str, target_id: &str) -> Result<bool>;

    /// Insert a parent→child edge. Returns the persisted relation, or
    /// `None` when an edge with the same natural key already exists.
    async fn link(
        &self,
        parent_id: &str,
        child_id: &str,
        attribute: Option<&str>,
        sort_order: i32,
    ) -> Result<Option<Relation>>;

    /// Remove an edge by natural key. Returns the removed relation, if any.
    async fn unlink(&self, natural_key: &str) -> Result<Option<Relation>>;

    /// Rewrite every edge under `parent_id` from `old_attribute` to
    /// `new_attribute`, all-or-nothing.
    async fn rename_attribute(
        &self,
        parent_id: &str,
        old_attribute: &str,
        new_attribute: &str,
    ) -> Result<Vec<Relation>>;
}
