//! Summary aggregator implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};

use super::summaries_traits::{SummaryAggregatorTrait, SummaryRepositoryTrait};
use super::StatDataSummary;
use crate::area_data::{AreaDataRepositoryTrait, AreaDataRow};
use crate::formulas::compute_summary_from_data;
use crate::store::{DataStoreTrait, WriteOp};
use crate::Result;

/// Maintains one materialized summary per (stat, boundary, context).
pub struct SummaryAggregator {
    repository: Arc<dyn SummaryRepositoryTrait>,
    area_data_repository: Arc<dyn AreaDataRepositoryTrait>,
    store: Arc<dyn DataStoreTrait>,
}

impl SummaryAggregator {
    pub fn new(
        repository: Arc<dyn SummaryRepositoryTrait>,
        area_data_repository: Arc<dyn AreaDataRepositoryTrait>,
        store: Arc<dyn DataStoreTrait>,
    ) -> Self {
        Self {
            repository,
            area_data_repository,
            store,
        }
    }

    /// Build the upserted summary for a row without persisting it.
    ///
    /// The idempotency guarantee lives here in the open: find by natural
    /// key, then either refresh the existing record or create a new one.
    /// Repeated imports of the same context can only overwrite.
    pub fn build_upsert_for_row(&self, row: &AreaDataRow) -> Result<StatDataSummary> {
        let computed = StatDataSummary::for_row(row, compute_summary_from_data(&row.data));
        match self.repository.find_by_key(&computed.natural_key())? {
            Some(existing) => {
                debug!("Refreshing existing summary {}", existing.natural_key());
                Ok(StatDataSummary {
                    updated_at: Utc::now(),
                    ..computed
                })
            }
            None => Ok(computed),
        }
    }
}

#[async_trait]
impl SummaryAggregatorTrait for SummaryAggregator {
    fn build_for_row(&self, row: &AreaDataRow) -> Result<StatDataSummary> {
        self.build_upsert_for_row(row)
    }

    async fn upsert_for_row(&self, row: &AreaDataRow) -> Result<StatDataSummary> {
        let summary = self.build_upsert_for_row(row)?;
        debug!(
            "Upserting summary {} (count={})",
            summary.natural_key(),
            summary.count
        );
        self.store
            .transact(vec![WriteOp::PutSummary(summary.clone())])
            .await?;
        Ok(summary)
    }

    async fn recompute_all(&self) -> Result<usize> {
        let rows = self.area_data_repository.get_all_rows()?;
        info!("Recomputing summaries for {} data row(s)", rows.len());

        let mut written = 0;
        for row in rows {
            self.upsert_for_row(&row).await?;
            written += 1;
        }
        Ok(written)
    }
}
