//! Builds the session service from configuration.

use anyhow::{Context, Result};
use gymbro_application::WorkoutSessionService;
use gymbro_core::config::{RootConfig, SessionBackend};
use gymbro_core::session::SessionStore;
use gymbro_core::user::UserRepository;
use gymbro_core::workout::WorkoutRepository;
use gymbro_infrastructure::{
    AsyncDirWorkoutRepository, JsonUserRepository, KvSessionStore, MemoryKeyValueClient,
    MemorySessionStore, MemoryUserRepository, MemoryWorkoutRepository,
};
use std::sync::Arc;

pub async fn build_service(config: &RootConfig) -> Result<Arc<WorkoutSessionService>> {
    let settings = config.engine_settings()?;

    let store: Arc<dyn SessionStore> = match config.storage.session_backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::Kv => Arc::new(KvSessionStore::new(Arc::new(MemoryKeyValueClient::new()))),
    };

    let (users, workouts): (Arc<dyn UserRepository>, Arc<dyn WorkoutRepository>) =
        match &config.storage.history_dir {
            Some(dir) => (
                Arc::new(
                    JsonUserRepository::new(dir)
                        .await
                        .with_context(|| format!("Failed to open user store in {}", dir.display()))?,
                ),
                Arc::new(
                    AsyncDirWorkoutRepository::new(dir)
                        .await
                        .with_context(|| format!("Failed to open history in {}", dir.display()))?,
                ),
            ),
            None => (
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemoryWorkoutRepository::new()),
            ),
        };

    tracing::info!(
        session_backend = %config.storage.session_backend,
        durable_history = config.storage.history_dir.is_some(),
        "Session engine wired"
    );

    Ok(Arc::new(WorkoutSessionService::new(
        store, users, workouts, settings,
    )))
}
