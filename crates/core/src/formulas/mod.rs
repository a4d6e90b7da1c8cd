//! Formulas module - pure derivation of value maps and aggregates.

mod formulas_engine;
mod formulas_model;


pub use formulas_engine::{
    compute_change_over_time, compute_derived_values, compute_sum, compute_summary_from_data,
};
pub use formulas_model::{Formula, SummaryStats};
