//! In-memory store used by service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::area_data::{AreaDataRepositoryTrait, AreaDataRow};
use crate::errors::Error;
use crate::relationships::{Relation, RelationRepositoryTrait};
use crate::statistics::{Statistic, StatisticRepositoryTrait};
use crate::store::{DataStoreTrait, StoreError, WriteOp};
use crate::summaries::{StatDataSummary, SummaryRepositoryTrait};
use crate::Result;

fn row_key(row: &AreaDataRow) -> String {
    format!(
        "{}::{}::{}::{}",
        row.stat_id, row.boundary_type, row.date, row.data_type
    )
}

/// Implements the write contract and every repository trait over in-memory
/// maps, recording each transacted batch for assertions.
#[derive(Default)]
pub struct MemoryStore {
    pub statistics: Mutex<HashMap<String, Statistic>>,
    pub relations: Mutex<HashMap<String, Relation>>,
    pub rows: Mutex<HashMap<String, AreaDataRow>>,
    pub summaries: Mutex<HashMap<String, StatDataSummary>>,
    pub batch_sizes: Mutex<Vec<usize>>,
    /// When set, the batch at this zero-based position fails.
    pub fail_on_batch: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_statistic(&self, stat: Statistic) {
        self.statistics.lock().unwrap().insert(stat.id.clone(), stat);
    }

    pub fn insert_relation(&self, relation: Relation) {
        self.relations
            .lock()
            .unwrap()
            .insert(relation.natural_key(), relation);
    }

    pub fn insert_row(&self, row: AreaDataRow) {
        self.rows.lock().unwrap().insert(row_key(&row), row);
    }
}

#[async_trait]
impl DataStoreTrait for MemoryStore {
    async fn transact(&self, batch: Vec<WriteOp>) -> Result<()> {
        {
            let mut sizes = self.batch_sizes.lock().unwrap();
            if *self.fail_on_batch.lock().unwrap() == Some(sizes.len()) {
                return Err(Error::Store(StoreError::TransactionFailed(
                    "simulated store failure".to_string(),
                )));
            }
            sizes.push(batch.len());
        }

        for op in batch {
            match op {
                WriteOp::PutStatistic(stat) => {
                    self.insert_statistic(stat);
                }
                WriteOp::DeleteStatistic { stat_id } => {
                    self.statistics.lock().unwrap().remove(&stat_id);
                }
                WriteOp::PutRelation(relation) => {
                    self.insert_relation(relation);
                }
                WriteOp::DeleteRelation { natural_key } => {
                    self.relations.lock().unwrap().remove(&natural_key);
                }
                WriteOp::PutAreaData(row) => {
                    self.insert_row(row);
                }
                WriteOp::DeleteAreaDataForStat { stat_id } => {
                    self.rows
                        .lock()
                        .unwrap()
                        .retain(|_, row| row.stat_id != stat_id);
                }
                WriteOp::PutSummary(summary) => {
                    self.summaries
                        .lock()
                        .unwrap()
                        .insert(summary.natural_key(), summary);
                }
                WriteOp::DeleteSummariesForStat { stat_id } => {
                    self.summaries
                        .lock()
                        .unwrap()
                        .retain(|_, summary| summary.stat_id != stat_id);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StatisticRepositoryTrait for MemoryStore {
    fn get_by_id(&self, stat_id: &str) -> Result<Option<Statistic>> {
        Ok(self.statistics.lock().unwrap().get(stat_id).cloned())
    }

    fn get_all(&self) -> Result<Vec<Statistic>> {
        Ok(self.statistics.lock().unwrap().values().cloned().collect())
    }
}

#[async_trait]
impl RelationRepositoryTrait for MemoryStore {
    fn get_relations(&self) -> Result<Vec<Relation>> {
        Ok(self.relations.lock().unwrap().values().cloned().collect())
    }

    fn get_relations_for_parent(&self, parent_id: &str) -> Result<Vec<Relation>> {
        Ok(self
            .relations
            .lock()
            .unwrap()
            .values()
            .filter(|relation| relation.parent_id == parent_id)
            .cloned()
            .collect())
    }

    fn find_by_key(&self, natural_key: &str) -> Result<Option<Relation>> {
        Ok(self.relations.lock().unwrap().get(natural_key).cloned())
    }
}

#[async_trait]
impl AreaDataRepositoryTrait for MemoryStore {
    fn get_rows_for_stat(&self, stat_id: &str) -> Result<Vec<AreaDataRow>> {
        let mut rows: Vec<AreaDataRow> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.stat_id == stat_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(rows)
    }

    fn get_all_rows(&self) -> Result<Vec<AreaDataRow>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }
}

#[async_trait]
impl SummaryRepositoryTrait for MemoryStore {
    fn find_by_key(&self, natural_key: &str) -> Result<Option<StatDataSummary>> {
        Ok(self.summaries.lock().unwrap().get(natural_key).cloned())
    }
}
