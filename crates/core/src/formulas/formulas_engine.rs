//! Pure computation over area-keyed value maps.
//!
//! Every function here is side-effect-free and total over its inputs: keys
//! that cannot satisfy a formula's finiteness or divisor requirements are
//! omitted from the result rather than carried as NaN or infinity.

use std::collections::{HashMap, HashSet};

use super::formulas_model::{Formula, SummaryStats};

/// Compute a derived value map from two operand maps.
///
/// For [`Formula::Sum`] and [`Formula::Difference`] the result key set is
/// the union of both operands; for all other formulas it is `a`'s key set.
pub fn compute_derived_values(
    a: &HashMap<String, f64>,
    b: &HashMap<String, f64>,
    formula: Formula,
) -> HashMap<String, f64> {
    let keys: HashSet<&String> = if formula.unions_keys() {
        a.keys().chain(b.keys()).collect()
    } else {
        a.keys().collect()
    };

    let mut result = HashMap::with_capacity(keys.len());
    for key in keys {
        let left = a.get(key).copied().filter(|v| v.is_finite());
        let right = b.get(key).copied().filter(|v| v.is_finite());

        let value = match formula {
            Formula::Sum => match (left, right) {
                (Some(l), Some(r)) => Some(l + r),
                (Some(only), None) | (None, Some(only)) => Some(only),
                (None, None) => None,
            },
            Formula::Difference => match (left, right) {
                (Some(l), Some(r)) => Some(l - r),
                (Some(only), None) => Some(only),
                (None, Some(only)) => Some(-only),
                (None, None) => None,
            },
            Formula::Percent | Formula::Ratio => divide(left, right),
            Formula::RatePer1000 => divide(left, right).map(|v| v * 1000.0),
            Formula::Index => divide(left, right).map(|v| v * 100.0),
        };

        if let Some(value) = value.filter(|v| v.is_finite()) {
            result.insert(key.clone(), value);
        }
    }
    result
}

fn divide(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Relative change per area between two dated rows: `(end - start) / |start|`.
///
/// Areas missing from either endpoint, or whose start value is zero or
/// non-finite, are omitted.
pub fn compute_change_over_time(
    rows_by_date: &HashMap<String, HashMap<String, f64>>,
    start_key: &str,
    end_key: &str,
) -> HashMap<String, f64> {
    let (Some(start_row), Some(end_row)) = (rows_by_date.get(start_key), rows_by_date.get(end_key))
    else {
        return HashMap::new();
    };

    start_row
        .iter()
        .filter_map(|(area, &start)| {
            if !start.is_finite() || start == 0.0 {
                return None;
            }
            let end = end_row.get(area).copied().filter(|v| v.is_finite())?;
            let change = (end - start) / start.abs();
            change.is_finite().then(|| (area.clone(), change))
        })
        .collect()
}

/// Sum N operand maps per area key.
///
/// The result key set is the union of all operands; a key is emitted only if
/// at least one operand contributed a finite value for it.
pub fn compute_sum(operands: &[&HashMap<String, f64>]) -> HashMap<String, f64> {
    let mut result: HashMap<String, f64> = HashMap::new();
    for operand in operands {
        for (area, &value) in operand.iter() {
            if value.is_finite() {
                *result.entry(area.clone()).or_insert(0.0) += value;
            }
        }
    }
    result
}

/// Count/sum/avg/min/max over the finite values of a map.
///
/// Returns the all-zero summary when no finite value exists; the average is
/// never a division by zero.
pub fn compute_summary_from_data(data: &HashMap<String, f64>) -> SummaryStats {
    let mut count = 0u64;
    let mut sum = 0.0f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for &value in data.values() {
        if !value.is_finite() {
            continue;
        }
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }

    if count == 0 {
        return SummaryStats::default();
    }
    SummaryStats {
        count,
        sum,
        avg: sum / count as f64,
        min,
        max,
    }
}
