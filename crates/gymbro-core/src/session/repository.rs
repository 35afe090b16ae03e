//! Session store trait.
//!
//! Defines the contract every Session Store backend must honor.

use super::model::WorkoutSession;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Keyed storage for at most one active session per user.
///
/// This trait decouples the session engine from the concrete storage
/// mechanism (single-process map, shared key-value store, ...).
///
/// # Implementation Notes
///
/// Implementations must be safe for concurrent use and must:
/// - enforce the one-session-per-user invariant atomically in `create`
/// - treat `update` and `update_seal` as a compare-and-swap on
///   `WorkoutSession::revision`
/// - never hand out a value that aliases internal state
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new session keyed by `session.user_id`.
    ///
    /// # Errors
    ///
    /// - `GymError::AlreadyActive`: the user already owns a session
    /// - `GymError::StoreUnavailable`: store failure
    async fn create(&self, session: &WorkoutSession) -> Result<()>;

    /// Returns a copy of the user's session.
    ///
    /// # Errors
    ///
    /// - `GymError::NotFound`: no session for the user
    async fn get(&self, user_id: &str) -> Result<WorkoutSession>;

    /// Replaces the stored session if its revision still equals
    /// `session.revision`.
    ///
    /// On success the stored copy gets `revision + 1` and a fresh
    /// `last_updated`; that stored copy is returned.
    ///
    /// # Errors
    ///
    /// - `GymError::NotFound`: no session for the user
    /// - `GymError::Conflict`: another writer updated the session first
    async fn update(&self, user_id: &str, session: &WorkoutSession) -> Result<WorkoutSession>;

    /// Compare-and-swap like `update`, but the stored `last_updated` is kept.
    ///
    /// Used to set and clear `sealed_at`. Claiming a session for
    /// reconciliation is not activity, so a session that was stale before a
    /// failed reconciliation is still stale after it.
    ///
    /// # Errors
    ///
    /// Same as `update`.
    async fn update_seal(&self, user_id: &str, session: &WorkoutSession) -> Result<WorkoutSession>;

    /// Removes the user's session.
    ///
    /// # Errors
    ///
    /// - `GymError::NotFound`: no session for the user (callers ending a
    ///   session treat this as non-fatal)
    async fn delete(&self, user_id: &str) -> Result<()>;

    /// Returns a complete snapshot of sessions whose `last_updated` is older
    /// than `max_age`.
    ///
    /// Each call scans afresh; backends that page internally must return all
    /// pages, never a partial one.
    async fn list_stale(&self, max_age: Duration) -> Result<Vec<WorkoutSession>>;
}
