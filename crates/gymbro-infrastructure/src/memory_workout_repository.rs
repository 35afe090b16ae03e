//! In-memory WorkoutRepository implementation.

use async_trait::async_trait;
use gymbro_core::error::Result;
use gymbro_core::workout::{Workout, WorkoutRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps completed workouts in memory, keyed by workout ID.
#[derive(Clone, Default)]
pub struct MemoryWorkoutRepository {
    workouts: Arc<RwLock<HashMap<String, Workout>>>,
}

impl MemoryWorkoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.workouts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.workouts.read().await.is_empty()
    }
}

#[async_trait]
impl WorkoutRepository for MemoryWorkoutRepository {
    async fn save(&self, workout: &Workout) -> Result<()> {
        let mut workouts = self.workouts.write().await;
        workouts.insert(workout.workout_id.clone(), workout.clone());
        Ok(())
    }

    async fn find_by_id(&self, workout_id: &str) -> Result<Option<Workout>> {
        let workouts = self.workouts.read().await;
        Ok(workouts.get(workout_id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Workout>> {
        let workouts = self.workouts.read().await;
        let mut result: Vec<Workout> = workouts
            .values()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(result)
    }
}
