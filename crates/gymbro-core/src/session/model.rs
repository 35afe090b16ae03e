//! Workout session domain model.
//!
//! A `WorkoutSession` is the ephemeral, mutable aggregate of a workout in
//! progress. It owns its records exclusively and keeps a running point total
//! that always equals the sum of its records' points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// One logged exercise set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Generated, opaque record identifier (UUID format)
    pub record_id: String,
    /// Owning session; never changes once set
    pub session_id: String,
    pub exercise_id: i64,
    pub reps: i64,
    pub weight: i64,
    /// Derived score for this set
    pub points: i64,
}

impl Record {
    /// Creates a record owned by `session_id` with a fresh id.
    pub fn new(session_id: &str, exercise_id: i64, reps: i64, weight: i64, points: i64) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            exercise_id,
            reps,
            weight,
            points,
        }
    }
}

/// A user's workout in progress.
///
/// At most one exists per `user_id`; the Session Store enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub user_id: String,
    /// Unique session identifier (UUID format); becomes the workout id
    pub session_id: String,
    pub start_time: DateTime<Utc>,
    /// Refreshed by the store on every successful update
    pub last_updated: DateTime<Utc>,
    /// Records in insertion order
    #[serde(default)]
    pub records: Vec<Record>,
    /// Running total, equal to the sum of `records[*].points`
    #[serde(default)]
    pub points: i64,
    /// Store-managed revision used for compare-and-swap updates
    #[serde(default)]
    pub revision: u64,
    /// When a reconciliation claimed the session. While set, the session
    /// accepts no mutations; a failed reconciliation clears it again.
    #[serde(default)]
    pub sealed_at: Option<DateTime<Utc>>,
}

impl WorkoutSession {
    /// Creates an empty session for `user_id` starting now.
    pub fn new(user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            session_id: Uuid::new_v4().to_string(),
            start_time: now,
            last_updated: now,
            records: Vec::new(),
            points: 0,
            revision: 0,
            sealed_at: None,
        }
    }

    /// True when the last mutation is strictly older than `max_age` at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match chrono::Duration::from_std(max_age) {
            Ok(max_age) => now.signed_duration_since(self.last_updated) > max_age,
            Err(_) => false,
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed_at.is_some()
    }

    /// True when a seal exists and is younger than `lease` at `now`, meaning
    /// its reconciliation may still be running.
    pub fn seal_is_held(&self, now: DateTime<Utc>, lease: Duration) -> bool {
        let Some(sealed_at) = self.sealed_at else {
            return false;
        };
        match chrono::Duration::from_std(lease) {
            Ok(lease) => now.signed_duration_since(sealed_at) <= lease,
            Err(_) => true,
        }
    }

    pub fn find_record(&self, record_id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.record_id == record_id)
    }

    /// Appends a record and adds its points to the total.
    pub fn push_record(&mut self, record: Record) {
        self.points = self.points.saturating_add(record.points);
        self.records.push(record);
    }

    /// Removes a record, subtracting its points from the total.
    pub fn remove_record(&mut self, record_id: &str) -> Option<Record> {
        let index = self.records.iter().position(|r| r.record_id == record_id)?;
        let removed = self.records.remove(index);
        self.points = self.points.saturating_sub(removed.points);
        Some(removed)
    }

    /// Replaces reps/weight/points of a record and adjusts the total by the delta.
    ///
    /// Returns the point delta, or `None` if no such record exists.
    pub fn update_record(
        &mut self,
        record_id: &str,
        reps: i64,
        weight: i64,
        points: i64,
    ) -> Option<i64> {
        let record = self.records.iter_mut().find(|r| r.record_id == record_id)?;
        let delta = points.saturating_sub(record.points);
        record.reps = reps;
        record.weight = weight;
        record.points = points;
        self.points = self.points.saturating_add(delta);
        Some(delta)
    }

    /// Adds `bonus` to the record at `index` and to the session total.
    pub fn award_bonus(&mut self, index: usize, bonus: i64) {
        if let Some(record) = self.records.get_mut(index) {
            record.points = record.points.saturating_add(bonus);
            self.points = self.points.saturating_add(bonus);
        }
    }

    /// Sum of the records' points; equals `points` for any well-formed session.
    pub fn records_points_total(&self) -> i64 {
        self.records
            .iter()
            .fold(0i64, |total, r| total.saturating_add(r.points))
    }
}
