//! Session Store over a shared key-value backend.
//!
//! Sessions are stored as JSON under `<prefix><user_id>`. The one-session
//! invariant rides on `set_if_absent`; lost updates are prevented by a
//! compare-and-swap against the exact serialized value that was read.

use super::client::{CasOutcome, KeyValueClient};
use async_trait::async_trait;
use chrono::Utc;
use gymbro_core::error::{GymError, Result};
use gymbro_core::session::{SessionStore, WorkoutSession};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_KEY_PREFIX: &str = "gymbro:session:";

/// Keys fetched per scan round trip.
const SCAN_PAGE_SIZE: usize = 10;

/// `SessionStore` for deployments where several instances share state.
pub struct KvSessionStore {
    client: Arc<dyn KeyValueClient>,
    prefix: String,
}

impl KvSessionStore {
    pub fn new(client: Arc<dyn KeyValueClient>) -> Self {
        Self::with_prefix(client, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(client: Arc<dyn KeyValueClient>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    fn key(&self, user_id: &str) -> String {
        format!("{}{}", self.prefix, user_id)
    }

    async fn load_raw(&self, user_id: &str) -> Result<(String, WorkoutSession)> {
        let raw = self
            .client
            .get(&self.key(user_id))
            .await?
            .ok_or_else(|| GymError::not_found("WorkoutSession", user_id))?;
        let session = serde_json::from_str(&raw)?;
        Ok((raw, session))
    }

    async fn swap(&self, user_id: &str, session: &WorkoutSession, touch: bool) -> Result<WorkoutSession> {
        let (raw, stored) = self.load_raw(user_id).await?;
        if stored.revision != session.revision {
            return Err(GymError::conflict("WorkoutSession", user_id));
        }

        let mut next = session.clone();
        next.revision = stored.revision + 1;
        next.last_updated = if touch { Utc::now() } else { stored.last_updated };
        let data = serde_json::to_string(&next)?;

        match self
            .client
            .compare_and_swap(&self.key(user_id), &raw, data)
            .await?
        {
            CasOutcome::Swapped => Ok(next),
            CasOutcome::Mismatch => Err(GymError::conflict("WorkoutSession", user_id)),
            CasOutcome::Missing => Err(GymError::not_found("WorkoutSession", user_id)),
        }
    }
}

#[async_trait]
impl SessionStore for KvSessionStore {
    async fn create(&self, session: &WorkoutSession) -> Result<()> {
        let data = serde_json::to_string(session)?;
        if self.client.set_if_absent(&self.key(&session.user_id), data).await? {
            Ok(())
        } else {
            Err(GymError::already_active(&session.user_id))
        }
    }

    async fn get(&self, user_id: &str) -> Result<WorkoutSession> {
        let (_, session) = self.load_raw(user_id).await?;
        Ok(session)
    }

    async fn update(&self, user_id: &str, session: &WorkoutSession) -> Result<WorkoutSession> {
        self.swap(user_id, session, true).await
    }

    async fn update_seal(&self, user_id: &str, session: &WorkoutSession) -> Result<WorkoutSession> {
        self.swap(user_id, session, false).await
    }

    async fn delete(&self, user_id: &str) -> Result<()> {
        if self.client.delete(&self.key(user_id)).await? {
            Ok(())
        } else {
            Err(GymError::not_found("WorkoutSession", user_id))
        }
    }

    async fn list_stale(&self, max_age: Duration) -> Result<Vec<WorkoutSession>> {
        let now = Utc::now();
        let mut stale = Vec::new();
        let mut cursor = 0;

        loop {
            let page = self
                .client
                .scan(cursor, &self.prefix, SCAN_PAGE_SIZE)
                .await?;

            for key in page.keys {
                // Ended between scan and get
                let Some(raw) = self.client.get(&key).await? else {
                    continue;
                };
                let session: WorkoutSession = match serde_json::from_str(&raw) {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::warn!(
                            target: "gymbro::storage",
                            key = %key,
                            error = %e,
                            "Skipping undecodable session"
                        );
                        continue;
                    }
                };
                if session.is_stale(now, max_age) {
                    stale.push(session);
                }
            }

            if page.next_cursor == 0 {
                break;
            }
            cursor = page.next_cursor;
        }

        Ok(stale)
    }
}
