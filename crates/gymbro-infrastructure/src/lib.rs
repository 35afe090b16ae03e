//! Infrastructure layer for GYMBRO.
//!
//! Concrete implementations of the repository traits declared in
//! `gymbro-core`, plus configuration loading.

pub mod async_dir_workout_repository;
pub mod config_service;
pub mod json_user_repository;
pub mod kv;
pub mod memory_session_store;
pub mod memory_user_repository;
pub mod memory_workout_repository;
pub mod paths;
pub mod storage;

pub use crate::async_dir_workout_repository::AsyncDirWorkoutRepository;
pub use crate::config_service::ConfigService;
pub use crate::json_user_repository::JsonUserRepository;
pub use crate::kv::{KeyValueClient, KvSessionStore, MemoryKeyValueClient};
pub use crate::memory_session_store::MemorySessionStore;
pub use crate::memory_user_repository::MemoryUserRepository;
pub use crate::memory_workout_repository::MemoryWorkoutRepository;
