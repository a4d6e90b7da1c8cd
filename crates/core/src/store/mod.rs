//! Store module - persistence contract and write batching.

mod batcher;
mod store_errors;
mod store_model;
mod store_traits;

pub use batcher::TransactionBatcher;
pub use store_errors::StoreError;
pub use store_model::WriteOp;
pub use store_traits::DataStoreTrait;
