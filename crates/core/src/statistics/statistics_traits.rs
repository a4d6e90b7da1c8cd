//! Traits for statistic repository and service.

use async_trait::async_trait;

use super::{CascadeDeleteResult, NewStatistic, Statistic, StatisticUpdate};
use crate::Result;

/// Repository trait for statistic point reads. Writes go through the
/// [`DataStoreTrait`](crate::store::DataStoreTrait) as batched operations.
#[async_trait]
pub trait StatisticRepositoryTrait: Send + Sync {
    fn get_by_id(&self, stat_id: &str) -> Result<Option<Statistic>>;
    fn get_all(&self) -> Result<Vec<Statistic>>;
}

/// Service trait for statistic business logic.
#[async_trait]
pub trait StatisticServiceTrait: Send + Sync {
    fn get_statistic(&self, stat_id: &str) -> Result<Statistic>;
    fn list_statistics(&self) -> Result<Vec<Statistic>>;
    async fn create_statistic(&self, new_statistic: NewStatistic) -> Result<Statistic>;
    async fn update_statistic(&self, stat_id: &str, update: StatisticUpdate) -> Result<Statistic>;

    /// Delete a statistic and every descendant left without a parent,
    /// together with their rows, summaries, and touching relations.
    async fn delete_statistic_cascade(&self, stat_id: &str) -> Result<CascadeDeleteResult>;
}
