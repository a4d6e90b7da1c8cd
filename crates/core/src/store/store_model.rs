//! Write operations accepted by the persistence contract.

use serde::{Deserialize, Serialize};

use crate::area_data::AreaDataRow;
use crate::relationships::Relation;
use crate::statistics::Statistic;
use crate::summaries::StatDataSummary;

/// One write against the document store.
///
/// Puts are upserts keyed by the entity's id or natural key; deletes are
/// no-ops when the target is already gone. Both properties keep replayed
/// batches idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum WriteOp {
    PutStatistic(Statistic),
    DeleteStatistic { stat_id: String },
    PutRelation(Relation),
    DeleteRelation { natural_key: String },
    PutAreaData(AreaDataRow),
    DeleteAreaDataForStat { stat_id: String },
    PutSummary(StatDataSummary),
    DeleteSummariesForStat { stat_id: String },
}
