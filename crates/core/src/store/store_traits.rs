//! Persistence contract implemented by the hosting application.

use async_trait::async_trait;

use super::store_model::WriteOp;
use crate::Result;

/// Transactional write surface of the document store.
///
/// A single `transact` call is atomic: every operation in the batch applies
/// or none does. Atomicity across calls is explicitly not provided; the
/// [`TransactionBatcher`](super::TransactionBatcher) and its callers are
/// built around that limitation.
#[async_trait]
pub trait DataStoreTrait: Send + Sync {
    async fn transact(&self, batch: Vec<WriteOp>) -> Result<()>;
}
