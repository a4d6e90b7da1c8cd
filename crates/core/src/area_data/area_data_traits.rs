//! Repository trait for geo-indexed data rows.

use async_trait::async_trait;

use super::AreaDataRow;
use crate::Result;

/// Point reads over stored data rows. Writes go through the
/// [`DataStoreTrait`](crate::store::DataStoreTrait) as batched operations.
#[async_trait]
pub trait AreaDataRepositoryTrait: Send + Sync {
    /// Rows of one statistic across every boundary type and date, ordered
    /// by date.
    fn get_rows_for_stat(&self, stat_id: &str) -> Result<Vec<AreaDataRow>>;
    /// Every stored row; used by the bulk summary recompute.
    fn get_all_rows(&self) -> Result<Vec<AreaDataRow>>;
}
