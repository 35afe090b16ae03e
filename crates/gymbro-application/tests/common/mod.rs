#![allow(dead_code)]

use async_trait::async_trait;
use gymbro_application::WorkoutSessionService;
use gymbro_core::config::EngineSettings;
use gymbro_core::error::{GymError, Result};
use gymbro_core::session::{SessionStore, WorkoutSession};
use gymbro_core::user::{Max, UserRepository};
use gymbro_core::workout::{Workout, WorkoutRepository};
use gymbro_infrastructure::{MemorySessionStore, MemoryUserRepository, MemoryWorkoutRepository};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const SEAL_LEASE: Duration = Duration::from_secs(60);

pub fn settings() -> EngineSettings {
    EngineSettings {
        scheduler_interval: Duration::from_millis(20),
        inactivity_timeout: INACTIVITY_TIMEOUT,
        personal_record_bonus: 50,
        scoring_base: 100,
        seal_lease: SEAL_LEASE,
    }
}

/// Workout repository whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyWorkoutRepository {
    pub inner: MemoryWorkoutRepository,
    pub fail_saves: AtomicBool,
}

impl FlakyWorkoutRepository {
    pub fn set_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl WorkoutRepository for FlakyWorkoutRepository {
    async fn save(&self, workout: &Workout) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(GymError::store("history database is down"));
        }
        self.inner.save(workout).await
    }

    async fn find_by_id(&self, workout_id: &str) -> Result<Option<Workout>> {
        self.inner.find_by_id(workout_id).await
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Workout>> {
        self.inner.list_by_user(user_id).await
    }
}

/// User repository whose active-flag writes can be switched to fail, and
/// whose next `list_maxes` can be parked until the test lets it go.
#[derive(Default)]
pub struct FlakyUserRepository {
    pub inner: MemoryUserRepository,
    pub fail_flag_writes: AtomicBool,
    hold_next_max_read: AtomicBool,
    max_read_parked: Notify,
    max_read_resume: Notify,
}

impl FlakyUserRepository {
    /// Parks the next `list_maxes` call, which reconciliation makes right
    /// after sealing.
    pub fn hold_next_max_read(&self) {
        self.hold_next_max_read.store(true, Ordering::SeqCst);
    }

    /// Waits until a held `list_maxes` call is parked.
    pub async fn max_read_parked(&self) {
        self.max_read_parked.notified().await;
    }

    pub fn resume_max_read(&self) {
        self.max_read_resume.notify_one();
    }
}

#[async_trait]
impl UserRepository for FlakyUserRepository {
    async fn set_active(&self, user_id: &str, active: bool) -> Result<()> {
        if self.fail_flag_writes.load(Ordering::SeqCst) {
            return Err(GymError::store("user database is down"));
        }
        self.inner.set_active(user_id, active).await
    }

    async fn is_active(&self, user_id: &str) -> Result<bool> {
        self.inner.is_active(user_id).await
    }

    async fn find_max(&self, user_id: &str, exercise_id: i64) -> Result<Option<Max>> {
        self.inner.find_max(user_id, exercise_id).await
    }

    async fn list_maxes(&self, user_id: &str) -> Result<Vec<Max>> {
        if self.hold_next_max_read.swap(false, Ordering::SeqCst) {
            self.max_read_parked.notify_one();
            self.max_read_resume.notified().await;
        }
        self.inner.list_maxes(user_id).await
    }

    async fn upsert_max(&self, max: &Max) -> Result<()> {
        self.inner.upsert_max(max).await
    }
}

pub struct Harness {
    pub service: Arc<WorkoutSessionService>,
    pub store: Arc<MemorySessionStore>,
    pub users: Arc<FlakyUserRepository>,
    pub workouts: Arc<FlakyWorkoutRepository>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemorySessionStore::new()))
    }

    pub fn with_store(store: Arc<MemorySessionStore>) -> Self {
        let users = Arc::new(FlakyUserRepository::default());
        let workouts = Arc::new(FlakyWorkoutRepository::default());
        let service = Arc::new(WorkoutSessionService::new(
            store.clone(),
            users.clone(),
            workouts.clone(),
            settings(),
        ));
        Self {
            service,
            store,
            users,
            workouts,
        }
    }

    /// Stores `session` as if it had been idle past the timeout.
    pub async fn insert_idle(&self, mut session: WorkoutSession) -> WorkoutSession {
        session.last_updated = chrono::Utc::now() - chrono::Duration::minutes(45);
        self.store.create(&session).await.unwrap();
        session
    }
}
