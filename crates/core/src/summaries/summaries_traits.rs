//! Traits for summary persistence and aggregation.

use async_trait::async_trait;

use super::StatDataSummary;
use crate::area_data::AreaDataRow;
use crate::Result;

/// Repository trait for summary point reads.
#[async_trait]
pub trait SummaryRepositoryTrait: Send + Sync {
    fn find_by_key(&self, natural_key: &str) -> Result<Option<StatDataSummary>>;
}

/// Service trait for maintaining materialized summaries.
#[async_trait]
pub trait SummaryAggregatorTrait: Send + Sync {
    /// Compute the upserted summary for a row without persisting it, for
    /// callers that fold the write into a larger batch.
    fn build_for_row(&self, row: &AreaDataRow) -> Result<StatDataSummary>;

    /// Upsert the summary for one row; called on every row write.
    async fn upsert_for_row(&self, row: &AreaDataRow) -> Result<StatDataSummary>;

    /// Full-rescan recompute over every stored row. Operator escape hatch;
    /// scheduling is the caller's concern.
    async fn recompute_all(&self) -> Result<usize>;
}
