//! User repository trait.
//!
//! Covers the slice of the user store the session engine touches: the
//! "currently working out" flag and the per-exercise personal records.

use super::model::Max;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for user workout state.
///
/// # Implementation Notes
///
/// Implementations must be safe for concurrent use. `upsert_max` replaces
/// any stored value for the same `(user_id, exercise_id)` pair; the
/// improvement check is the caller's responsibility.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Sets the "currently active" flag.
    async fn set_active(&self, user_id: &str, active: bool) -> Result<()>;

    /// Reads the "currently active" flag. Unknown users are inactive.
    async fn is_active(&self, user_id: &str) -> Result<bool>;

    /// Finds the stored max for one exercise.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Max))`: Max found
    /// - `Ok(None)`: The user never logged this exercise
    /// - `Err(_)`: Store failure
    async fn find_max(&self, user_id: &str, exercise_id: i64) -> Result<Option<Max>>;

    /// Lists every stored max for the user (empty when none).
    async fn list_maxes(&self, user_id: &str) -> Result<Vec<Max>>;

    /// Inserts or replaces a max.
    async fn upsert_max(&self, max: &Max) -> Result<()>;
}
