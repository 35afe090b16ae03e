//! Completed workout domain model.

use crate::session::{Record, WorkoutSession};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The frozen image of a session at end time. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Same value as the originating session id
    pub workout_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub points: i64,
    pub records: Vec<Record>,
}

impl Workout {
    /// Snapshots `session` as a workout ending at `end_time`.
    pub fn from_session(session: &WorkoutSession, end_time: DateTime<Utc>) -> Self {
        Self {
            workout_id: session.session_id.clone(),
            user_id: session.user_id.clone(),
            start_time: session.start_time,
            end_time,
            points: session.points,
            records: session.records.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_session_copies_state() {
        let mut session = WorkoutSession::new("user-1");
        session.push_record(Record::new(&session.session_id.clone(), 7, 5, 100, 100));
        let end = Utc::now();

        let workout = Workout::from_session(&session, end);

        assert_eq!(workout.workout_id, session.session_id);
        assert_eq!(workout.user_id, "user-1");
        assert_eq!(workout.points, 100);
        assert_eq!(workout.records, session.records);
        assert_eq!(workout.end_time, end);
    }
}
