//! Import queue orchestrator.
//!
//! One owned instance per session drives the whole pipeline: drain the FIFO
//! queue, fetch each (variable, year) pair sequentially, create requested
//! derived children, and wire parent/child relations once the queue is
//! empty. Failures are item-scoped; the queue itself never aborts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::import_queue_errors::{FetchError, ImportError};
use super::import_queue_model::{
    DerivedChildRequest, DrainOptions, DrainOutcome, DrainSummary, ImportMetadata,
    ImportQueueItem, ImportStatus, QueueRelationship, ReconciliationJob,
};
use super::import_queue_traits::{CensusFetchTrait, ImportQueueServiceTrait};
use crate::area_data::{AreaDataRepositoryTrait, AreaDataRow};
use crate::constants::DERIVED_STAT_SOURCE;
use crate::errors::Error;
use crate::formulas::{compute_change_over_time, compute_derived_values, Formula};
use crate::relationships::{Relation, RelationRepositoryTrait, RelationshipGraph};
use crate::statistics::{Statistic, StatisticRepositoryTrait, Visibility};
use crate::store::{TransactionBatcher, WriteOp};
use crate::summaries::SummaryAggregatorTrait;
use crate::Result;

/// Outcome of processing one queue item.
enum ItemOutcome {
    Success { stat_id: String },
    Failed { message: String, timed_out: bool },
}

pub struct ImportQueueService {
    queue: Mutex<Vec<ImportQueueItem>>,
    reconciliation: Mutex<Vec<ReconciliationJob>>,
    drain_in_flight: AtomicBool,
    fetcher: Arc<dyn CensusFetchTrait>,
    metadata: ImportMetadata,
    statistic_repository: Arc<dyn StatisticRepositoryTrait>,
    relation_repository: Arc<dyn RelationRepositoryTrait>,
    area_data_repository: Arc<dyn AreaDataRepositoryTrait>,
    aggregator: Arc<dyn SummaryAggregatorTrait>,
    batcher: Arc<TransactionBatcher>,
}

/// Clears the in-flight flag when a drain exits, on success or failure.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ImportQueueService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fetcher: Arc<dyn CensusFetchTrait>,
        metadata: ImportMetadata,
        statistic_repository: Arc<dyn StatisticRepositoryTrait>,
        relation_repository: Arc<dyn RelationRepositoryTrait>,
        area_data_repository: Arc<dyn AreaDataRepositoryTrait>,
        aggregator: Arc<dyn SummaryAggregatorTrait>,
        batcher: Arc<TransactionBatcher>,
    ) -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            reconciliation: Mutex::new(Vec::new()),
            drain_in_flight: AtomicBool::new(false),
            fetcher,
            metadata,
            statistic_repository,
            relation_repository,
            area_data_repository,
            aggregator,
            batcher,
        }
    }

    /// Mark the first pending item as running and return a snapshot of it.
    async fn take_next_pending(&self) -> Option<ImportQueueItem> {
        let mut queue = self.queue.lock().await;
        let item = queue
            .iter_mut()
            .find(|item| item.status == ImportStatus::Pending)?;
        item.status = ImportStatus::Running;
        Some(item.clone())
    }

    async fn finalize_item(&self, item_id: &str, outcome: ItemOutcome) {
        let mut queue = self.queue.lock().await;
        let Some(item) = queue.iter_mut().find(|item| item.id == item_id) else {
            // The queue was reset underneath us; nothing left to record.
            warn!("Drained item {item_id} no longer present in queue");
            return;
        };
        match outcome {
            ItemOutcome::Success { stat_id } => {
                item.status = ImportStatus::Success;
                item.imported_stat_id = Some(stat_id);
                item.error_message = None;
            }
            ItemOutcome::Failed { message, timed_out } => {
                item.status = ImportStatus::Error;
                item.error_message = Some(message.clone());
                if timed_out {
                    drop(queue);
                    self.reconciliation
                        .lock()
                        .await
                        .push(ReconciliationJob::new(item_id, message));
                }
            }
        }
    }

    /// Fetch every year of one item, oldest last, then create the requested
    /// derived child. Failure stops the remaining years of this item only.
    async fn process_item(&self, item: &ImportQueueItem) -> ItemOutcome {
        let mut imported_stat_id: Option<String> = None;

        for year in item.year_span() {
            debug!(
                "Fetching {}/{} variable {} for year {}",
                item.dataset, item.group, item.variable, year
            );
            match self
                .fetcher
                .fetch(&item.dataset, &item.group, &item.variable, year, &self.metadata)
                .await
            {
                Ok(fetched) => imported_stat_id = Some(fetched.stat_id),
                Err(err) => {
                    let timed_out = matches!(err, FetchError::Timeout { .. });
                    warn!("Import item {} failed: {err}", item.id);
                    return ItemOutcome::Failed {
                        message: err.to_string(),
                        timed_out,
                    };
                }
            }
        }

        let Some(stat_id) = imported_stat_id else {
            return ItemOutcome::Failed {
                message: "fetch returned no statistic id".to_string(),
                timed_out: false,
            };
        };

        if let Some(request) = &item.derived_child {
            match self.ensure_derived_child(&stat_id, item, request).await {
                Ok(Some(child_id)) => {
                    info!("Created derived child {child_id} for {stat_id}")
                }
                Ok(None) => {
                    debug!("Derived child for {stat_id} already exists, reusing")
                }
                Err(Error::Import(ImportError::DerivationEmpty { attribute, .. })) => {
                    // The base import landed, so the item still succeeds;
                    // the empty derivation leaves no partial artifact.
                    warn!("Derivation '{attribute}' for {stat_id} produced no values, skipping")
                }
                Err(err) => {
                    return ItemOutcome::Failed {
                        message: err.to_string(),
                        timed_out: false,
                    }
                }
            }
        }

        ItemOutcome::Success { stat_id }
    }

    /// Create the derived child statistic, its rows, summaries, and the
    /// parent relation in one batched submission.
    ///
    /// Returns `Ok(None)` when a relation with the target attribute already
    /// exists for this parent: a retried or overlapping drain must not
    /// create the child twice.
    async fn ensure_derived_child(
        &self,
        parent_stat_id: &str,
        item: &ImportQueueItem,
        request: &DerivedChildRequest,
    ) -> Result<Option<String>> {
        let attribute = item
            .stat_attribute
            .clone()
            .unwrap_or_else(|| request.default_attribute().to_string());

        let existing = self
            .relation_repository
            .get_relations_for_parent(parent_stat_id)?
            .into_iter()
            .find(|relation| relation.attribute_or_sentinel() == attribute);
        if existing.is_some() {
            return Ok(None);
        }

        let child_stat_id = Uuid::new_v4().to_string();
        let rows = self.compute_derived_rows(parent_stat_id, &child_stat_id, request)?;
        if rows.is_empty() {
            return Err(ImportError::DerivationEmpty {
                parent_stat_id: parent_stat_id.to_string(),
                attribute,
            }
            .into());
        }

        let parent = self
            .statistic_repository
            .get_by_id(parent_stat_id)?
            .ok_or_else(|| Error::StatisticNotFound(parent_stat_id.to_string()))?;
        let now = Utc::now();
        let child = Statistic {
            id: child_stat_id.clone(),
            name: format!("{}_{}", parent.name, attribute),
            label: format!("{} ({})", parent.label, attribute),
            category: parent.category.clone(),
            source: DERIVED_STAT_SOURCE.to_string(),
            good_if_up: parent.good_if_up,
            visibility: Visibility::Inherited,
            created_by: self.metadata.created_by.clone(),
            created_on: now,
            last_updated: now,
        };
        let relation = Relation::new(parent_stat_id, child_stat_id.clone(), Some(attribute), 0);

        let mut operations = vec![WriteOp::PutStatistic(child)];
        for row in rows {
            operations.push(WriteOp::PutSummary(self.aggregator.build_for_row(&row)?));
            operations.push(WriteOp::PutAreaData(row));
        }
        operations.push(WriteOp::PutRelation(relation));
        self.batcher.submit(operations).await?;

        Ok(Some(child_stat_id))
    }

    fn compute_derived_rows(
        &self,
        parent_stat_id: &str,
        child_stat_id: &str,
        request: &DerivedChildRequest,
    ) -> Result<Vec<AreaDataRow>> {
        let parent_rows = self.area_data_repository.get_rows_for_stat(parent_stat_id)?;
        let mut rows = Vec::new();

        match request {
            DerivedChildRequest::Percent {
                denominator_stat_id,
            } => {
                let denominator_rows = self
                    .area_data_repository
                    .get_rows_for_stat(denominator_stat_id)?;
                for parent_row in &parent_rows {
                    let Some(denominator_row) = denominator_rows.iter().find(|row| {
                        row.boundary_type == parent_row.boundary_type
                            && row.date == parent_row.date
                    }) else {
                        continue;
                    };
                    let values = compute_derived_values(
                        &parent_row.data,
                        &denominator_row.data,
                        Formula::Percent,
                    );
                    if values.is_empty() {
                        continue;
                    }
                    rows.push(AreaDataRow::new(
                        child_stat_id,
                        parent_row.boundary_type,
                        parent_row.date.clone(),
                        Formula::Percent.result_data_type(),
                        values,
                        DERIVED_STAT_SOURCE,
                    ));
                }
            }
            DerivedChildRequest::ChangeOverTime => {
                let mut by_boundary: HashMap<_, HashMap<String, HashMap<String, f64>>> =
                    HashMap::new();
                for row in &parent_rows {
                    // Range dates describe already-derived change rows;
                    // only plain yearly rows feed a new change computation.
                    if row.date.parse::<i32>().is_err() {
                        continue;
                    }
                    by_boundary
                        .entry(row.boundary_type)
                        .or_default()
                        .insert(row.date.clone(), row.data.clone());
                }

                for (boundary_type, rows_by_date) in &by_boundary {
                    let mut years: Vec<&String> = rows_by_date.keys().collect();
                    years.sort();
                    let (Some(start), Some(end)) = (years.first(), years.last()) else {
                        continue;
                    };
                    if start == end {
                        continue;
                    }
                    let values = compute_change_over_time(rows_by_date, start, end);
                    if values.is_empty() {
                        continue;
                    }
                    rows.push(AreaDataRow::new(
                        child_stat_id,
                        *boundary_type,
                        format!("{start}-{end}"),
                        crate::constants::DATA_TYPE_PERCENT_CHANGE,
                        values,
                        DERIVED_STAT_SOURCE,
                    ));
                }
            }
        }
        Ok(rows)
    }

    /// The single designated parent for this drain: an explicit manual
    /// choice wins; otherwise the first queue item marked `Parent` that
    /// imported successfully.
    fn resolve_parent_stat(
        &self,
        options: &DrainOptions,
        items: &[ImportQueueItem],
    ) -> Option<String> {
        if let Some(parent) = &options.parent_stat_id {
            return Some(parent.clone());
        }
        items
            .iter()
            .find(|item| {
                item.relationship == QueueRelationship::Parent
                    && item.status == ImportStatus::Success
            })
            .and_then(|item| item.imported_stat_id.clone())
    }

    /// Wire every successfully imported child to the designated parent,
    /// deduplicated by natural key against the stored edge set.
    async fn link_children(&self, options: &DrainOptions) -> Result<usize> {
        let items = self.queue.lock().await.clone();
        let Some(parent_stat_id) = self.resolve_parent_stat(options, &items) else {
            debug!("No designated parent for this drain, skipping relation wiring");
            return Ok(0);
        };

        let mut graph =
            RelationshipGraph::from_relations(self.relation_repository.get_relations()?);
        let mut linked: Vec<Relation> = Vec::new();
        for (position, item) in items.iter().enumerate() {
            if item.relationship != QueueRelationship::Child
                || item.status != ImportStatus::Success
            {
                continue;
            }
            let Some(child_id) = &item.imported_stat_id else {
                continue;
            };
            if child_id == &parent_stat_id {
                continue;
            }

            let attribute = item.stat_attribute.as_deref();
            match graph.add_edge(&parent_stat_id, child_id, attribute, position as i32) {
                Ok(true) => {
                    let key = crate::relationships::relation_key(
                        &parent_stat_id,
                        child_id,
                        attribute,
                    );
                    if let Some(relation) = graph.get(&key) {
                        linked.push(relation.clone());
                    }
                }
                Ok(false) => {
                    debug!("Relation for child {child_id} already exists, skipping")
                }
                Err(err) => {
                    warn!("Skipping relation for child {child_id}: {err}")
                }
            }
        }

        if linked.is_empty() {
            return Ok(0);
        }

        let operations = linked
            .iter()
            .map(|relation| WriteOp::PutRelation(relation.clone()))
            .collect();
        self.batcher.submit(operations).await?;
        info!(
            "Linked {} child statistic(s) under {}",
            linked.len(),
            parent_stat_id
        );

        self.sync_child_visibility(&linked).await;
        Ok(linked.len())
    }

    /// Clear visibility overrides on newly linked children so they inherit
    /// from the parent. Self-healing on the next pass, so failures are
    /// logged, never surfaced.
    async fn sync_child_visibility(&self, linked: &[Relation]) {
        let mut operations = Vec::new();
        for relation in linked {
            let stat = match self.statistic_repository.get_by_id(&relation.child_id) {
                Ok(Some(stat)) => stat,
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        "Visibility sync read failed for {}: {err}",
                        relation.child_id
                    );
                    continue;
                }
            };
            if stat.visibility == Visibility::Inherited {
                continue;
            }
            operations.push(WriteOp::PutStatistic(Statistic {
                visibility: Visibility::Inherited,
                last_updated: Utc::now(),
                ..stat
            }));
        }
        if operations.is_empty() {
            return;
        }
        if let Err(err) = self.batcher.submit(operations).await {
            warn!("Visibility sync failed, will self-heal on next drain: {err}");
        }
    }
}

#[async_trait]
impl ImportQueueServiceTrait for ImportQueueService {
    async fn enqueue(&self, item: ImportQueueItem) {
        debug!(
            "Enqueued import of {}/{} variable {} ({} year span)",
            item.dataset, item.group, item.variable, item.years
        );
        self.queue.lock().await.push(item);
    }

    async fn items(&self) -> Vec<ImportQueueItem> {
        self.queue.lock().await.clone()
    }

    async fn reset(&self) -> Result<usize> {
        if self.drain_in_flight.load(Ordering::SeqCst) {
            return Err(ImportError::QueueBusy(
                "cannot reset the queue while a drain is running".to_string(),
            )
            .into());
        }
        let mut queue = self.queue.lock().await;
        let cleared = queue.len();
        queue.clear();
        Ok(cleared)
    }

    async fn drain(&self, options: DrainOptions) -> Result<DrainOutcome> {
        if self
            .drain_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Drain requested while another is in flight");
            return Ok(DrainOutcome::AlreadyRunning);
        }
        let _guard = DrainGuard(&self.drain_in_flight);

        let mut summary = DrainSummary::default();
        while let Some(item) = self.take_next_pending().await {
            summary.processed += 1;
            let outcome = self.process_item(&item).await;
            match &outcome {
                ItemOutcome::Success { .. } => summary.succeeded += 1,
                ItemOutcome::Failed { .. } => summary.failed += 1,
            }
            self.finalize_item(&item.id, outcome).await;
        }

        summary.relations_linked = self.link_children(&options).await?;
        info!(
            "Drain complete: {} processed, {} succeeded, {} failed, {} linked",
            summary.processed, summary.succeeded, summary.failed, summary.relations_linked
        );
        Ok(DrainOutcome::Completed(summary))
    }

    async fn pending_jobs(&self) -> Vec<ReconciliationJob> {
        self.reconciliation.lock().await.clone()
    }

    async fn dismiss_pending_job(&self, job_id: &str) -> bool {
        let mut jobs = self.reconciliation.lock().await;
        let before = jobs.len();
        jobs.retain(|job| job.id != job_id);
        jobs.len() < before
    }
}
