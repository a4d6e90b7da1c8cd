//! Error types for the import pipeline.

use thiserror::Error;

/// Failure of one external fetch call.
///
/// The distinction matters downstream: a hard failure is safe to retry by
/// re-enqueuing, a timeout is not, because a partial write may already have
/// landed on the far side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Fetch failed for year {year}: {message}")]
    Failed { year: i32, message: String },

    /// The call exceeded its deadline after a write may have landed.
    #[error("Fetch timed out for year {year}: {message}")]
    Timeout { year: i32, message: String },
}

/// Item-scoped import and derivation errors. These never abort the whole
/// queue.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Derivation produced no overlapping area keys; nothing was created.
    #[error("Derivation '{attribute}' for {parent_stat_id} produced no values")]
    DerivationEmpty {
        parent_stat_id: String,
        attribute: String,
    },

    #[error("Queue is busy: {0}")]
    QueueBusy(String),
}
