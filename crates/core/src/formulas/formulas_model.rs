//! Formula definitions for derived statistics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DATA_TYPE_INDEX, DATA_TYPE_PERCENT, DATA_TYPE_RATE_PER_1000, DATA_TYPE_RATIO,
};
use crate::errors::ValidationError;

/// Algebraic formula applied per area code across two operand rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// a / b, divisor must be non-zero.
    Percent,
    /// a + b; a single present finite operand stands alone.
    Sum,
    /// a - b.
    Difference,
    /// (a / b) * 1000.
    RatePer1000,
    /// a / b.
    Ratio,
    /// (a / b) * 100.
    Index,
}

impl Formula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formula::Percent => "percent",
            Formula::Sum => "sum",
            Formula::Difference => "difference",
            Formula::RatePer1000 => "rate_per_1000",
            Formula::Ratio => "ratio",
            Formula::Index => "index",
        }
    }

    /// True for formulas whose result key set is the union of both operand
    /// key sets; the rest keep the first operand's key set.
    pub fn unions_keys(&self) -> bool {
        matches!(self, Formula::Sum | Formula::Difference)
    }

    /// Semantic unit of the rows this formula produces.
    pub fn result_data_type(&self) -> &'static str {
        match self {
            Formula::Percent => DATA_TYPE_PERCENT,
            // Sums and differences of counts are still counts.
            Formula::Sum | Formula::Difference => crate::constants::DATA_TYPE_COUNT,
            Formula::RatePer1000 => DATA_TYPE_RATE_PER_1000,
            Formula::Ratio => DATA_TYPE_RATIO,
            Formula::Index => DATA_TYPE_INDEX,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formula {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percent" => Ok(Formula::Percent),
            "sum" => Ok(Formula::Sum),
            "difference" => Ok(Formula::Difference),
            "rate_per_1000" => Ok(Formula::RatePer1000),
            "ratio" => Ok(Formula::Ratio),
            "index" => Ok(Formula::Index),
            other => Err(ValidationError::UnknownFormula(other.to_string())),
        }
    }
}

/// Aggregate over the finite values of one data row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub count: u64,
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}
