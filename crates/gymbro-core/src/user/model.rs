//! Personal-record domain model.

use serde::{Deserialize, Serialize};

/// A user's best historical set for one exercise.
///
/// `reps` is the rep count achieved at `max_weight`. Written only when a
/// session's best set strictly improves on it; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Max {
    pub user_id: String,
    pub exercise_id: i64,
    pub max_weight: i64,
    pub reps: i64,
}

impl Max {
    pub fn new(user_id: &str, exercise_id: i64, max_weight: i64, reps: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            exercise_id,
            max_weight,
            reps,
        }
    }
}
