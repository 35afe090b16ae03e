//! Single-process Session Store.
//!
//! One `HashMap` guarded by one mutex. Every public method performs its whole
//! read-modify-write under that lock and copies sessions in and out, so no
//! caller ever holds a reference into the map.

use async_trait::async_trait;
use chrono::Utc;
use gymbro_core::error::{GymError, Result};
use gymbro_core::session::{SessionStore, WorkoutSession};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// In-memory `SessionStore` suitable for a single instance.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    /// Sessions keyed by user ID
    sessions: Arc<Mutex<HashMap<String, WorkoutSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    async fn swap(&self, user_id: &str, session: &WorkoutSession, touch: bool) -> Result<WorkoutSession> {
        let mut sessions = self.sessions.lock().await;
        let stored = sessions
            .get_mut(user_id)
            .ok_or_else(|| GymError::not_found("WorkoutSession", user_id))?;

        if stored.revision != session.revision {
            return Err(GymError::conflict("WorkoutSession", user_id));
        }

        let mut next = session.clone();
        next.revision = stored.revision + 1;
        next.last_updated = if touch { Utc::now() } else { stored.last_updated };
        *stored = next.clone();
        Ok(next)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &WorkoutSession) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&session.user_id) {
            return Err(GymError::already_active(&session.user_id));
        }
        sessions.insert(session.user_id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<WorkoutSession> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(user_id)
            .cloned()
            .ok_or_else(|| GymError::not_found("WorkoutSession", user_id))
    }

    async fn update(&self, user_id: &str, session: &WorkoutSession) -> Result<WorkoutSession> {
        self.swap(user_id, session, true).await
    }

    async fn update_seal(&self, user_id: &str, session: &WorkoutSession) -> Result<WorkoutSession> {
        self.swap(user_id, session, false).await
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| GymError::not_found("WorkoutSession", user_id))
    }

    async fn list_stale(&self, max_age: Duration) -> Result<Vec<WorkoutSession>> {
        let now = Utc::now();
        let sessions = self.sessions.lock().await;
        Ok(sessions
            .values()
            .filter(|s| s.is_stale(now, max_age))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymbro_core::session::Record;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemorySessionStore::new();
        let session = WorkoutSession::new("user-1");

        store.create(&session).await.unwrap();

        let found = store.get("user-1").await.unwrap();
        assert_eq!(found, session);
    }

    #[tokio::test]
    async fn test_second_create_is_already_active() {
        let store = MemorySessionStore::new();
        store.create(&WorkoutSession::new("user-1")).await.unwrap();

        let err = store
            .create(&WorkoutSession::new("user-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, GymError::AlreadyActive { .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_exactly_one() {
        let store = MemorySessionStore::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create(&WorkoutSession::new("user-1")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_get_returns_a_copy() {
        let store = MemorySessionStore::new();
        store.create(&WorkoutSession::new("user-1")).await.unwrap();

        let mut copy = store.get("user-1").await.unwrap();
        copy.push_record(Record::new(&copy.session_id.clone(), 7, 5, 100, 100));

        let stored = store.get("user-1").await.unwrap();
        assert!(stored.records.is_empty());
        assert_eq!(stored.points, 0);
    }

    #[tokio::test]
    async fn test_update_bumps_revision_and_refreshes_timestamp() {
        let store = MemorySessionStore::new();
        let mut session = WorkoutSession::new("user-1");
        session.last_updated = Utc::now() - chrono::Duration::hours(1);
        store.create(&session).await.unwrap();

        let mut loaded = store.get("user-1").await.unwrap();
        loaded.points = 10;
        let saved = store.update("user-1", &loaded).await.unwrap();

        assert_eq!(saved.revision, 1);
        assert!(saved.last_updated > session.last_updated);
        assert_eq!(store.get("user-1").await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_update_seal_keeps_staleness() {
        let store = MemorySessionStore::new();
        let mut session = WorkoutSession::new("user-1");
        session.last_updated = Utc::now() - chrono::Duration::minutes(45);
        store.create(&session).await.unwrap();

        let mut loaded = store.get("user-1").await.unwrap();
        loaded.sealed_at = Some(Utc::now());
        let saved = store.update_seal("user-1", &loaded).await.unwrap();

        assert_eq!(saved.revision, 1);
        assert_eq!(saved.last_updated, session.last_updated);
        assert_eq!(store.list_stale(Duration::from_secs(30 * 60)).await.unwrap(), vec![saved]);

        // Same revision check as a regular update
        assert!(store.update_seal("user-1", &loaded).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_stale_revision_conflicts() {
        let store = MemorySessionStore::new();
        store.create(&WorkoutSession::new("user-1")).await.unwrap();

        let first = store.get("user-1").await.unwrap();
        let second = store.get("user-1").await.unwrap();

        store.update("user-1", &first).await.unwrap();
        let err = store.update("user-1", &second).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = MemorySessionStore::new();
        let session = WorkoutSession::new("user-1");

        assert!(store.update("user-1", &session).await.unwrap_err().is_not_found());
        assert!(store.delete("user-1").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_list_stale_filters_by_age() {
        let store = MemorySessionStore::new();
        let mut old = WorkoutSession::new("old");
        old.last_updated = Utc::now() - chrono::Duration::minutes(45);
        store.create(&old).await.unwrap();
        store.create(&WorkoutSession::new("fresh")).await.unwrap();

        let stale = store.list_stale(Duration::from_secs(30 * 60)).await.unwrap();

        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].user_id, "old");
    }
}
