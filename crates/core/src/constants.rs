/// Data-row semantic units
///
/// Each constant names one of the supported `data_type` values carried by an
/// area data row. Derived rows use the unit of the formula that produced them.

/// Raw counted quantity (population, incidents, households).
pub const DATA_TYPE_COUNT: &str = "count";

/// Share of a denominator, expressed as a fraction.
pub const DATA_TYPE_PERCENT: &str = "percent";

/// Relative change between two dates: (end - start) / |start|.
pub const DATA_TYPE_PERCENT_CHANGE: &str = "percent_change";

/// Occurrences per 1,000 of the denominator.
pub const DATA_TYPE_RATE_PER_1000: &str = "rate_per_1000";

/// Plain quotient of two counts.
pub const DATA_TYPE_RATIO: &str = "ratio";

/// Quotient scaled to a base-100 index.
pub const DATA_TYPE_INDEX: &str = "index";

/// Sentinel stored in a relation's natural key when no attribute was given.
///
/// The key format predates this crate; existing stored relations use the
/// literal string "undefined" for attribute-less edges, so we must keep
/// emitting it.
pub const RELATION_ATTRIBUTE_SENTINEL: &str = "undefined";

/// Number of write operations per atomic chunk submitted by the
/// [`TransactionBatcher`](crate::store::TransactionBatcher).
///
/// The persistence layer guarantees atomicity only within a single
/// transaction; chunks beyond the first are applied sequentially and a crash
/// mid-sequence can leave a prefix applied. Callers compensate with
/// existence checks before re-submitting.
pub const TRANSACTION_CHUNK_SIZE: usize = 10;

/// Source label attached to statistics created by the formula engine.
pub const DERIVED_STAT_SOURCE: &str = "derived";
