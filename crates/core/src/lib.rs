//! Civiscope Core - Domain entities, services, and traits.
//!
//! This crate contains the statistics-graph business logic for Civiscope:
//! the relationship graph between named statistics, the formula engine that
//! derives new statistics from geo-indexed time series, and the import
//! queue orchestrator. It is storage-agnostic and defines traits that are
//! implemented by the hosting application's persistence layer.

pub mod area_data;
pub mod constants;
pub mod errors;
pub mod formulas;
pub mod import_queue;
pub mod relationships;
pub mod statistics;
pub mod store;
pub mod summaries;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
