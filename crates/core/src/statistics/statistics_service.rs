//! Statistic service implementation.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::info;

use super::statistics_traits::{StatisticRepositoryTrait, StatisticServiceTrait};
use super::{CascadeDeleteResult, NewStatistic, Statistic, StatisticUpdate};
use crate::errors::Error;
use crate::relationships::{RelationRepositoryTrait, RelationshipGraph};
use crate::store::{TransactionBatcher, WriteOp};
use crate::Result;

pub struct StatisticService {
    repository: Arc<dyn StatisticRepositoryTrait>,
    relation_repository: Arc<dyn RelationRepositoryTrait>,
    batcher: Arc<TransactionBatcher>,
}

impl StatisticService {
    pub fn new(
        repository: Arc<dyn StatisticRepositoryTrait>,
        relation_repository: Arc<dyn RelationRepositoryTrait>,
        batcher: Arc<TransactionBatcher>,
    ) -> Self {
        Self {
            repository,
            relation_repository,
            batcher,
        }
    }
}

#[async_trait]
impl StatisticServiceTrait for StatisticService {
    fn get_statistic(&self, stat_id: &str) -> Result<Statistic> {
        self.repository
            .get_by_id(stat_id)?
            .ok_or_else(|| Error::StatisticNotFound(stat_id.to_string()))
    }

    fn list_statistics(&self) -> Result<Vec<Statistic>> {
        self.repository.get_all()
    }

    async fn create_statistic(&self, new_statistic: NewStatistic) -> Result<Statistic> {
        let statistic = new_statistic.into_statistic(Utc::now());
        self.batcher
            .submit(vec![WriteOp::PutStatistic(statistic.clone())])
            .await?;
        Ok(statistic)
    }

    async fn update_statistic(&self, stat_id: &str, update: StatisticUpdate) -> Result<Statistic> {
        let existing = self.get_statistic(stat_id)?;
        let updated = update.apply(existing, Utc::now());
        self.batcher
            .submit(vec![WriteOp::PutStatistic(updated.clone())])
            .await?;
        Ok(updated)
    }

    async fn delete_statistic_cascade(&self, stat_id: &str) -> Result<CascadeDeleteResult> {
        // Existence is checked first so a typo'd id fails instead of
        // silently writing a single-node cascade.
        self.get_statistic(stat_id)?;

        let graph = RelationshipGraph::from_relations(self.relation_repository.get_relations()?);
        let cascade = graph.collect_orphaned_descendants(stat_id);

        let mut relation_keys: HashSet<String> = HashSet::new();
        for deleted_id in &cascade.to_delete {
            for edge in graph.edges_touching(deleted_id) {
                relation_keys.insert(edge.natural_key());
            }
        }

        let mut operations: Vec<WriteOp> = Vec::new();
        for natural_key in &relation_keys {
            operations.push(WriteOp::DeleteRelation {
                natural_key: natural_key.clone(),
            });
        }
        for deleted_id in &cascade.to_delete {
            operations.push(WriteOp::DeleteAreaDataForStat {
                stat_id: deleted_id.clone(),
            });
            operations.push(WriteOp::DeleteSummariesForStat {
                stat_id: deleted_id.clone(),
            });
            operations.push(WriteOp::DeleteStatistic {
                stat_id: deleted_id.clone(),
            });
        }

        info!(
            "Cascade delete of {}: removing {} statistic(s), {} relation(s)",
            stat_id,
            cascade.to_delete.len(),
            relation_keys.len()
        );
        self.batcher.submit(operations).await?;

        Ok(CascadeDeleteResult {
            deleted_stat_ids: cascade.to_delete,
            unlinked_relation_keys: cascade
                .to_unlink
                .iter()
                .map(|edge| edge.natural_key())
                .collect(),
        })
    }
}
