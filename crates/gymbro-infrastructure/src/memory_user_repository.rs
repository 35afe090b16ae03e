//! In-memory UserRepository implementation.

use async_trait::async_trait;
use gymbro_core::error::Result;
use gymbro_core::user::{Max, UserRepository};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone)]
struct UserState {
    active: bool,
    /// Keyed by exercise ID
    maxes: BTreeMap<i64, Max>,
}

/// Keeps user flags and maxes in memory.
#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<String, UserState>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn set_active(&self, user_id: &str, active: bool) -> Result<()> {
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_default().active = active;
        Ok(())
    }

    async fn is_active(&self, user_id: &str) -> Result<bool> {
        let users = self.users.read().await;
        Ok(users.get(user_id).map(|u| u.active).unwrap_or(false))
    }

    async fn find_max(&self, user_id: &str, exercise_id: i64) -> Result<Option<Max>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .and_then(|u| u.maxes.get(&exercise_id))
            .cloned())
    }

    async fn list_maxes(&self, user_id: &str) -> Result<Vec<Max>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .map(|u| u.maxes.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_max(&self, max: &Max) -> Result<()> {
        let mut users = self.users.write().await;
        users
            .entry(max.user_id.clone())
            .or_default()
            .maxes
            .insert(max.exercise_id, max.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_active_flag_defaults_to_false() {
        let repo = MemoryUserRepository::new();
        assert!(!repo.is_active("user-1").await.unwrap());

        repo.set_active("user-1", true).await.unwrap();
        assert!(repo.is_active("user-1").await.unwrap());

        repo.set_active("user-1", false).await.unwrap();
        assert!(!repo.is_active("user-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_replaces_max_per_exercise() {
        let repo = MemoryUserRepository::new();
        repo.upsert_max(&Max::new("user-1", 7, 100, 5)).await.unwrap();
        repo.upsert_max(&Max::new("user-1", 7, 110, 3)).await.unwrap();
        repo.upsert_max(&Max::new("user-1", 3, 60, 10)).await.unwrap();

        assert_eq!(
            repo.find_max("user-1", 7).await.unwrap(),
            Some(Max::new("user-1", 7, 110, 3))
        );
        assert_eq!(repo.list_maxes("user-1").await.unwrap().len(), 2);
        assert!(repo.find_max("user-2", 7).await.unwrap().is_none());
        assert!(repo.list_maxes("user-2").await.unwrap().is_empty());
    }
}
