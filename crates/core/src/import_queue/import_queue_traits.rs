//! Traits for the external fetch contract and the import queue service.

use async_trait::async_trait;

use super::import_queue_errors::FetchError;
use super::import_queue_model::{
    DrainOptions, DrainOutcome, FetchedImport, ImportMetadata, ImportQueueItem, ReconciliationJob,
};
use crate::Result;

/// Opaque census data source.
///
/// One call covers one (variable, year) pair: the implementation fetches the
/// raw data, persists the statistic and its rows, and returns the statistic
/// id. The orchestrator never issues two calls for the same pair within one
/// queue pass, and never issues them in parallel.
#[async_trait]
pub trait CensusFetchTrait: Send + Sync {
    async fn fetch(
        &self,
        dataset: &str,
        group: &str,
        variable: &str,
        year: i32,
        metadata: &ImportMetadata,
    ) -> std::result::Result<FetchedImport, FetchError>;
}

/// Queue operations consumed by the UI layer.
#[async_trait]
pub trait ImportQueueServiceTrait: Send + Sync {
    async fn enqueue(&self, item: ImportQueueItem);

    /// Snapshot of the queue, including terminal items.
    async fn items(&self) -> Vec<ImportQueueItem>;

    /// Clear the queue. Fails while a drain is in flight.
    async fn reset(&self) -> Result<usize>;

    /// Process every pending item, then wire parent/child relations.
    /// Single-flight: a call that overlaps a running drain returns
    /// [`DrainOutcome::AlreadyRunning`] without touching the queue.
    async fn drain(&self, options: DrainOptions) -> Result<DrainOutcome>;

    /// Timed-out imports awaiting manual reconciliation.
    async fn pending_jobs(&self) -> Vec<ReconciliationJob>;

    /// Acknowledge (not retry) a reconciliation job. Returns whether the
    /// job existed.
    async fn dismiss_pending_job(&self, job_id: &str) -> bool;
}
