//! Scoring and personal-record selection.
//!
//! Points compare a set's estimated one-rep max (Epley) against the user's
//! stored best for the same exercise, scaled to `base`.

use crate::session::Record;
use crate::user::Max;
use std::collections::BTreeMap;

/// Per-rep factor of the Epley estimate.
pub const EPLEY_FACTOR: f64 = 0.0333;

/// `weight * (1 + 0.0333 * reps)`
pub fn estimated_one_rep_max(weight: i64, reps: i64) -> f64 {
    weight as f64 * (1.0 + EPLEY_FACTOR * reps as f64)
}

/// Points for a set relative to an explicit baseline.
///
/// A non-positive baseline estimate scores `base`.
pub fn calculate_points(
    baseline_weight: i64,
    baseline_reps: i64,
    weight: i64,
    reps: i64,
    base: i64,
) -> i64 {
    let baseline = estimated_one_rep_max(baseline_weight, baseline_reps);
    if baseline <= 0.0 {
        return base;
    }
    let ratio = estimated_one_rep_max(weight, reps) / baseline;
    (ratio * base as f64).round() as i64
}

/// Points for a set against the user's stored max.
///
/// With no stored max, or when the set is heavier than the stored max, the
/// set is its own baseline and scores exactly `base`. A set at the stored
/// weight is always scored by ratio, so extra reps score above `base`.
pub fn score_set(stored: Option<&Max>, weight: i64, reps: i64, base: i64) -> i64 {
    match stored {
        Some(max) if weight <= max.max_weight => {
            calculate_points(max.max_weight, max.reps, weight, reps, base)
        }
        _ => base,
    }
}

/// Tie-break order: heavier wins; on equal weight, more reps wins.
pub fn is_better_set(weight: i64, reps: i64, than_weight: i64, than_reps: i64) -> bool {
    weight > than_weight || (weight == than_weight && reps > than_reps)
}

/// True when a set strictly improves on the stored max (or none exists).
pub fn improves(stored: Option<&Max>, weight: i64, reps: i64) -> bool {
    match stored {
        None => true,
        Some(max) => is_better_set(weight, reps, max.max_weight, max.reps),
    }
}

/// Selects the best set per exercise.
///
/// Returns `exercise_id -> index into records`. Exact ties keep the earliest
/// record.
pub fn best_sets(records: &[Record]) -> BTreeMap<i64, usize> {
    let mut best: BTreeMap<i64, usize> = BTreeMap::new();
    for (index, record) in records.iter().enumerate() {
        match best.get(&record.exercise_id) {
            Some(&current) => {
                let current = &records[current];
                if is_better_set(record.weight, record.reps, current.weight, current.reps) {
                    best.insert(record.exercise_id, index);
                }
            }
            None => {
                best.insert(record.exercise_id, index);
            }
        }
    }
    best
}
