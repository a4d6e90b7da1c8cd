//! Relationship service implementation.
//!
//! The in-memory graph does the structural checks; this service loads it
//! from the repository and pushes accepted mutations back through the
//! transaction batcher. Structural rejections (cycle, rename conflict)
//! happen before any write, so a failed call leaves the stored edge set
//! untouched.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::relationships_model::relation_key;
use super::relationships_traits::{RelationRepositoryTrait, RelationshipServiceTrait};
use super::{Relation, RelationshipGraph};
use crate::errors::Error;
use crate::store::{TransactionBatcher, WriteOp};
use crate::Result;

pub struct RelationshipService {
    repository: Arc<dyn RelationRepositoryTrait>,
    batcher: Arc<TransactionBatcher>,
}

impl RelationshipService {
    pub fn new(
        repository: Arc<dyn RelationRepositoryTrait>,
        batcher: Arc<TransactionBatcher>,
    ) -> Self {
        Self {
            repository,
            batcher,
        }
    }
}

#[async_trait]
impl RelationshipServiceTrait for RelationshipService {
    fn load_graph(&self) -> Result<RelationshipGraph> {
        Ok(RelationshipGraph::from_relations(
            self.repository.get_relations()?,
        ))
    }

    fn has_descendant(&self, ancestor_id: &str, target_id: &str) -> Result<bool> {
        Ok(self.load_graph()?.has_descendant(ancestor_id, target_id))
    }

    async fn link(
        &self,
        parent_id: &str,
        child_id: &str,
        attribute: Option<&str>,
        sort_order: i32,
    ) -> Result<Option<Relation>> {
        let mut graph = self.load_graph()?;
        let inserted = graph
            .add_edge(parent_id, child_id, attribute, sort_order)
            .map_err(Error::Relationship)?;
        if !inserted {
            debug!(
                "Relation {} already exists, treating link as no-op",
                relation_key(parent_id, child_id, attribute)
            );
            return Ok(None);
        }

        let relation = graph
            .get(&relation_key(parent_id, child_id, attribute))
            .cloned()
            .ok_or_else(|| Error::Unexpected("inserted relation missing from graph".to_string()))?;
        self.batcher
            .submit(vec![WriteOp::PutRelation(relation.clone())])
            .await?;
        Ok(Some(relation))
    }

    async fn unlink(&self, natural_key: &str) -> Result<Option<Relation>> {
        let Some(relation) = self.repository.find_by_key(natural_key)? else {
            return Ok(None);
        };
        self.batcher
            .submit(vec![WriteOp::DeleteRelation {
                natural_key: natural_key.to_string(),
            }])
            .await?;
        Ok(Some(relation))
    }

    async fn rename_attribute(
        &self,
        parent_id: &str,
        old_attribute: &str,
        new_attribute: &str,
    ) -> Result<Vec<Relation>> {
        let mut graph = self.load_graph()?;
        let renamed = graph
            .rename_attribute(parent_id, old_attribute, new_attribute)
            .map_err(Error::Relationship)?;

        // Each rewritten edge changes its natural key, so the old record is
        // deleted alongside the new put.
        let mut operations = Vec::with_capacity(renamed.len() * 2);
        for relation in &renamed {
            operations.push(WriteOp::DeleteRelation {
                natural_key: relation_key(
                    &relation.parent_id,
                    &relation.child_id,
                    Some(old_attribute),
                ),
            });
            operations.push(WriteOp::PutRelation(relation.clone()));
        }
        self.batcher.submit(operations).await?;
        Ok(renamed)
    }
}
