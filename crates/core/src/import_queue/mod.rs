//! Import queue module - the orchestrator that drains import jobs.

mod import_queue_errors;
mod import_queue_model;
mod import_queue_service;
mod import_queue_traits;


pub use import_queue_errors::{FetchError, ImportError};
pub use import_queue_model::{
    DerivedChildRequest, DrainOptions, DrainOutcome, DrainSummary, FetchedImport, ImportMetadata,
    ImportQueueItem, ImportStatus, QueueRelationship, ReconciliationJob,
};
pub use import_queue_service::ImportQueueService;
pub use import_queue_traits::{CensusFetchTrait, ImportQueueServiceTrait};
