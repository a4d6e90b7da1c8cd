//! Bounded-size sequential write batching.
//!
//! The persistence layer caps how many operations one transaction may carry,
//! so an ordered write list is split into fixed-size chunks submitted one at
//! a time. Each chunk is atomic; the full list is not. A crash mid-sequence
//! leaves a prefix applied, which callers tolerate through existence checks
//! (idempotent create) before re-submitting.

use std::sync::Arc;

use log::debug;

use super::store_errors::StoreError;
use super::store_model::WriteOp;
use super::store_traits::DataStoreTrait;
use crate::constants::TRANSACTION_CHUNK_SIZE;
use crate::errors::Error;
use crate::Result;

pub struct TransactionBatcher {
    store: Arc<dyn DataStoreTrait>,
    chunk_size: usize,
}

impl TransactionBatcher {
    pub fn new(store: Arc<dyn DataStoreTrait>) -> Self {
        Self::with_chunk_size(store, TRANSACTION_CHUNK_SIZE)
    }

    pub fn with_chunk_size(store: Arc<dyn DataStoreTrait>, chunk_size: usize) -> Self {
        Self {
            store,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Submit `operations` as sequential atomic chunks, awaiting each before
    /// issuing the next.
    ///
    /// On a chunk failure the remaining chunks are not attempted and the
    /// error reports how many chunks already applied.
    pub async fn submit(&self, operations: Vec<WriteOp>) -> Result<usize> {
        if operations.is_empty() {
            return Ok(0);
        }

        let total_chunks = operations.len().div_ceil(self.chunk_size);
        debug!(
            "Submitting {} write op(s) in {} chunk(s) of up to {}",
            operations.len(),
            total_chunks,
            self.chunk_size
        );

        let mut applied_chunks = 0;
        let chunks: Vec<Vec<WriteOp>> = operations
            .chunks(self.chunk_size)
            .map(|chunk| chunk.to_vec())
            .collect();
        for chunk in chunks {
            self.store.transact(chunk).await.map_err(|e| {
                Error::Store(StoreError::PartialBatchFailure {
                    applied_chunks,
                    message: e.to_string(),
                })
            })?;
            applied_chunks += 1;
        }
        Ok(applied_chunks)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::statistics::{NewStatistic, Visibility};

    struct RecordingStore {
        batches: Mutex<Vec<usize>>,
        fail_on_batch: Option<usize>,
    }

    impl RecordingStore {
        fn new(fail_on_batch: Option<usize>) -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                fail_on_batch,
            }
        }
    }

    #[async_trait]
    impl DataStoreTrait for RecordingStore {
        async fn transact(&self, batch: Vec<WriteOp>) -> Result<()> {
            let mut batches = self.batches.lock().unwrap();
            if self.fail_on_batch == Some(batches.len()) {
                return Err(Error::Store(StoreError::TransactionFailed(
                    "simulated failure".to_string(),
                )));
            }
            batches.push(batch.len());
            Ok(())
        }
    }

    fn delete_ops(count: usize) -> Vec<WriteOp> {
        (0..count)
            .map(|i| WriteOp::DeleteStatistic {
                stat_id: format!("stat-{i}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_submit_empty_is_noop() {
        let store = Arc::new(RecordingStore::new(None));
        let batcher = TransactionBatcher::new(store.clone());

        assert_eq!(batcher.submit(Vec::new()).await.unwrap(), 0);
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_under_chunk_size_is_single_batch() {
        let store = Arc::new(RecordingStore::new(None));
        let batcher = TransactionBatcher::new(store.clone());

        assert_eq!(batcher.submit(delete_ops(7)).await.unwrap(), 1);
        assert_eq!(*store.batches.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn test_submit_partitions_into_fixed_chunks() {
        let store = Arc::new(RecordingStore::new(None));
        let batcher = TransactionBatcher::new(store.clone());

        assert_eq!(batcher.submit(delete_ops(23)).await.unwrap(), 3);
        assert_eq!(*store.batches.lock().unwrap(), vec![10, 10, 3]);
    }

    #[tokio::test]
    async fn test_submit_exact_multiple_of_chunk_size() {
        let store = Arc::new(RecordingStore::new(None));
        let batcher = TransactionBatcher::new(store.clone());

        assert_eq!(batcher.submit(delete_ops(20)).await.unwrap(), 2);
        assert_eq!(*store.batches.lock().unwrap(), vec![10, 10]);
    }

    #[tokio::test]
    async fn test_failure_reports_applied_prefix_and_stops() {
        let store = Arc::new(RecordingStore::new(Some(1)));
        let batcher = TransactionBatcher::new(store.clone());

        let err = batcher.submit(delete_ops(25)).await.unwrap_err();
        match err {
            Error::Store(StoreError::PartialBatchFailure { applied_chunks, .. }) => {
                assert_eq!(applied_chunks, 1)
            }
            other => panic!("expected partial batch failure, got {other}"),
        }
        // Only the first chunk landed; the third was never attempted.
        assert_eq!(*store.batches.lock().unwrap(), vec![10]);
    }

    #[tokio::test]
    async fn test_custom_chunk_size() {
        let store = Arc::new(RecordingStore::new(None));
        let batcher = TransactionBatcher::with_chunk_size(store.clone(), 4);

        assert_eq!(batcher.submit(delete_ops(9)).await.unwrap(), 3);
        assert_eq!(*store.batches.lock().unwrap(), vec![4, 4, 1]);
    }

    #[test]
    fn test_write_ops_serialize_with_op_tag() {
        let stat = NewStatistic {
            id: Some("stat-1".to_string()),
            name: "population".to_string(),
            label: "Population".to_string(),
            category: "demographics".to_string(),
            source: "acs".to_string(),
            good_if_up: None,
            visibility: Visibility::Public,
            created_by: "tester".to_string(),
        }
        .into_statistic(chrono::Utc::now());

        let json = serde_json::to_value(WriteOp::PutStatistic(stat)).unwrap();
        assert_eq!(json["op"], "putStatistic");
    }
}
