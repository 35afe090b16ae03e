//! Directory-backed WorkoutRepository implementation.
//!
//! Each completed workout is one JSON document, written atomically, so a
//! workout and its record snapshot land together or not at all.
//!
//! Directory structure:
//! ```text
//! base_dir/
//! └── workouts/
//!     ├── <workout-id-1>.json
//!     └── <workout-id-2>.json
//! ```

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use gymbro_core::error::{GymError, Result};
use gymbro_core::workout::{Workout, WorkoutRepository};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

const WORKOUTS_DIR: &str = "workouts";

pub struct AsyncDirWorkoutRepository {
    workouts_dir: PathBuf,
}

impl AsyncDirWorkoutRepository {
    /// Opens (and creates if needed) the history directory under `base_dir`.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let workouts_dir = base_dir.as_ref().join(WORKOUTS_DIR);
        fs::create_dir_all(&workouts_dir).await?;

        tracing::debug!(
            target: "gymbro::history",
            path = %workouts_dir.display(),
            "Workout history directory ready"
        );

        Ok(Self { workouts_dir })
    }

    pub fn workouts_dir(&self) -> &Path {
        &self.workouts_dir
    }

    /// Maps a workout ID to its file. IDs are UUIDs; anything else is
    /// rejected so a caller-supplied ID can never escape the directory.
    fn file_for(&self, workout_id: &str) -> Option<AtomicJsonFile<Workout>> {
        let id = Uuid::parse_str(workout_id).ok()?;
        Some(AtomicJsonFile::new(
            self.workouts_dir.join(format!("{}.json", id)),
        ))
    }
}

#[async_trait]
impl WorkoutRepository for AsyncDirWorkoutRepository {
    async fn save(&self, workout: &Workout) -> Result<()> {
        let file = self.file_for(&workout.workout_id).ok_or_else(|| {
            GymError::internal(format!("invalid workout id: {}", workout.workout_id))
        })?;
        file.save(workout).await
    }

    async fn find_by_id(&self, workout_id: &str) -> Result<Option<Workout>> {
        match self.file_for(workout_id) {
            Some(file) => file.load().await,
            None => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Workout>> {
        let mut workouts = Vec::new();
        let mut entries = fs::read_dir(&self.workouts_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match AtomicJsonFile::<Workout>::new(path.clone()).load().await {
                Ok(Some(workout)) if workout.user_id == user_id => workouts.push(workout),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        target: "gymbro::history",
                        path = %path.display(),
                        error = %e,
                        "Skipping unreadable workout file"
                    );
                }
            }
        }

        workouts.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(workouts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gymbro_core::session::{Record, WorkoutSession};

    fn workout_for(user_id: &str) -> Workout {
        let mut session = WorkoutSession::new(user_id);
        let session_id = session.session_id.clone();
        session.push_record(Record::new(&session_id, 7, 5, 100, 100));
        session.push_record(Record::new(&session_id, 3, 8, 60, 80));
        Workout::from_session(&session, Utc::now())
    }

    #[tokio::test]
    async fn test_save_and_find_roundtrip_keeps_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = AsyncDirWorkoutRepository::new(temp_dir.path()).await.unwrap();
        let workout = workout_for("user-1");

        repo.save(&workout).await.unwrap();

        let loaded = repo.find_by_id(&workout.workout_id).await.unwrap().unwrap();
        assert_eq!(loaded, workout);
        assert_eq!(loaded.records.len(), 2);
    }

    #[tokio::test]
    async fn test_find_unknown_or_malformed_id() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = AsyncDirWorkoutRepository::new(temp_dir.path()).await.unwrap();

        assert!(repo
            .find_by_id(&Uuid::new_v4().to_string())
            .await
            .unwrap()
            .is_none());
        assert!(repo.find_by_id("../etc/passwd").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_user_filters_and_orders() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = AsyncDirWorkoutRepository::new(temp_dir.path()).await.unwrap();

        let mut older = workout_for("user-1");
        older.start_time = Utc::now() - chrono::Duration::days(1);
        let newer = workout_for("user-1");
        let other = workout_for("user-2");

        repo.save(&newer).await.unwrap();
        repo.save(&older).await.unwrap();
        repo.save(&other).await.unwrap();
        // Retried save replaces instead of duplicating
        repo.save(&newer).await.unwrap();

        let listed = repo.list_by_user("user-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].workout_id, older.workout_id);
        assert_eq!(listed[1].workout_id, newer.workout_id);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let workout = workout_for("user-1");
        {
            let repo = AsyncDirWorkoutRepository::new(temp_dir.path()).await.unwrap();
            repo.save(&workout).await.unwrap();
        }

        let reopened = AsyncDirWorkoutRepository::new(temp_dir.path()).await.unwrap();
        assert!(reopened.find_by_id(&workout.workout_id).await.unwrap().is_some());
    }
}
