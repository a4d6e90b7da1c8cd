//! Core error types for the Civiscope statistics engine.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! are converted to these types by the hosting persistence layer.

use thiserror::Error;

use crate::import_queue::ImportError;
use crate::relationships::RelationshipError;
use crate::store::StoreError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the statistics core.
///
/// Database-specific errors are wrapped in string form by [`StoreError`] to
/// keep this type storage-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Relationship operation failed: {0}")]
    Relationship(#[from] RelationshipError),

    #[error("Import operation failed: {0}")]
    Import(#[from] ImportError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Statistic not found: {0}")]
    StatisticNotFound(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Unknown formula: {0}")]
    UnknownFormula(String),

    #[error("Unknown boundary type: {0}")]
    UnknownBoundaryType(String),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
