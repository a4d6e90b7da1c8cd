//! Summaries module - materialized per-context aggregates.

mod summaries_model;
mod summaries_service;
mod summaries_traits;


pub use summaries_model::{summary_key, StatDataSummary};
pub use summaries_service::SummaryAggregator;
pub use summaries_traits::{SummaryAggregatorTrait, SummaryRepositoryTrait};
