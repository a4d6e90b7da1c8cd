//! Storage-agnostic error type for persistence operations.

use thiserror::Error;

/// Errors surfaced by the persistence layer.
///
/// Uses `String` details so the hosting storage implementation can convert
/// its own errors without leaking backend types into the core.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A point-in-time query failed.
    #[error("Store query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// An atomic write batch failed to apply.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// A multi-chunk submission stopped partway: `applied_chunks` chunks
    /// landed before the failing one. Callers reconcile with existence
    /// checks before re-submitting.
    #[error("Batch submission failed after {applied_chunks} applied chunk(s): {message}")]
    PartialBatchFailure {
        applied_chunks: usize,
        message: String,
    },
}
