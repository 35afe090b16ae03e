//! Mutation inputs and their validation.
//!
//! Inputs arrive from the transport with every field optional so that a
//! missing field and an invalid one both surface as `GymError::Validation`,
//! listing all offending fields at once.

use crate::error::{GymError, Result};
use serde::{Deserialize, Serialize};

/// Largest accepted `reps`.
pub const MAX_REPS: i64 = 10_000;

/// Largest accepted `weight`.
pub const MAX_WEIGHT: i64 = 100_000;

/// Input for adding a record to the active session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordInput {
    pub exercise_id: Option<i64>,
    pub reps: Option<i64>,
    pub weight: Option<i64>,
}

/// Input for replacing reps/weight of an existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub reps: Option<i64>,
    pub weight: Option<i64>,
}

/// A set whose fields are all present, positive and within limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidSet {
    pub exercise_id: i64,
    pub reps: i64,
    pub weight: i64,
}

impl RecordInput {
    pub fn new(exercise_id: i64, reps: i64, weight: i64) -> Self {
        Self {
            exercise_id: Some(exercise_id),
            reps: Some(reps),
            weight: Some(weight),
        }
    }

    pub fn validate(&self) -> Result<ValidSet> {
        let mut errors = Vec::new();
        let exercise_id = check_field("exercise_id", self.exercise_id, i64::MAX, &mut errors);
        let reps = check_field("reps", self.reps, MAX_REPS, &mut errors);
        let weight = check_field("weight", self.weight, MAX_WEIGHT, &mut errors);

        match (exercise_id, reps, weight) {
            (Some(exercise_id), Some(reps), Some(weight)) => Ok(ValidSet {
                exercise_id,
                reps,
                weight,
            }),
            _ => Err(GymError::Validation(errors)),
        }
    }
}

impl RecordUpdate {
    pub fn new(reps: i64, weight: i64) -> Self {
        Self {
            reps: Some(reps),
            weight: Some(weight),
        }
    }

    /// Returns `(reps, weight)`.
    pub fn validate(&self) -> Result<(i64, i64)> {
        let mut errors = Vec::new();
        let reps = check_field("reps", self.reps, MAX_REPS, &mut errors);
        let weight = check_field("weight", self.weight, MAX_WEIGHT, &mut errors);

        match (reps, weight) {
            (Some(reps), Some(weight)) => Ok((reps, weight)),
            _ => Err(GymError::Validation(errors)),
        }
    }
}

fn check_field(field: &str, value: Option<i64>, max: i64, errors: &mut Vec<String>) -> Option<i64> {
    match value {
        None => {
            errors.push(format!("field {} is a required field", field));
            None
        }
        Some(v) if v < 1 => {
            errors.push(format!("field {} must be at least 1", field));
            None
        }
        Some(v) if v > max => {
            errors.push(format!("field {} must be at most {}", field, max));
            None
        }
        Some(v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_input() {
        let set = RecordInput::new(7, 5, 100).validate().unwrap();
        assert_eq!(
            set,
            ValidSet {
                exercise_id: 7,
                reps: 5,
                weight: 100
            }
        );
    }

    #[test]
    fn test_missing_and_non_positive_fields_are_all_reported() {
        let input = RecordInput {
            exercise_id: None,
            reps: Some(0),
            weight: Some(-5),
        };

        match input.validate() {
            Err(GymError::Validation(errors)) => {
                assert_eq!(
                    errors,
                    vec![
                        "field exercise_id is a required field".to_string(),
                        "field reps must be at least 1".to_string(),
                        "field weight must be at least 1".to_string(),
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_sets_are_rejected() {
        let input = RecordInput::new(7, MAX_REPS + 1, i64::MAX);

        match input.validate() {
            Err(GymError::Validation(errors)) => {
                assert_eq!(
                    errors,
                    vec![
                        "field reps must be at most 10000".to_string(),
                        "field weight must be at most 100000".to_string(),
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(RecordUpdate::new(3, MAX_WEIGHT + 1).validate().is_err());
        assert!(RecordInput::new(7, MAX_REPS, MAX_WEIGHT).validate().is_ok());
    }

    #[test]
    fn test_update_requires_both_fields() {
        let update = RecordUpdate {
            reps: Some(3),
            weight: None,
        };
        assert!(matches!(update.validate(), Err(GymError::Validation(_))));
        assert_eq!(RecordUpdate::new(3, 80).validate().unwrap(), (3, 80));
    }

    #[test]
    fn test_deserialize_partial_json() {
        let input: RecordInput = serde_json::from_str(r#"{"exercise_id": 7, "reps": 5}"#).unwrap();
        assert_eq!(input.weight, None);
        assert!(input.validate().is_err());
    }
}
