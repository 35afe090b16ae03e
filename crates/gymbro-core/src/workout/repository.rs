//! Workout history repository trait.

use super::model::Workout;
use crate::error::Result;
use async_trait::async_trait;

/// An append-only store of completed workouts.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    /// Persists a workout together with its record snapshot.
    ///
    /// Must be all-or-nothing: either the workout and all of its records are
    /// stored, or nothing is. Saving the same `workout_id` again replaces the
    /// earlier copy, so a retried reconciliation cannot duplicate history.
    async fn save(&self, workout: &Workout) -> Result<()>;

    /// Finds a workout by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Workout))`: Workout found
    /// - `Ok(None)`: Workout not found
    /// - `Err(_)`: Store failure
    async fn find_by_id(&self, workout_id: &str) -> Result<Option<Workout>>;

    /// Lists a user's workouts, oldest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Workout>>;
}
