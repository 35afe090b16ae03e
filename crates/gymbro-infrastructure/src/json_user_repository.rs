//! JSON-file UserRepository implementation.
//!
//! The whole user table lives in one `users.json`, cached in memory and
//! rewritten atomically after every change. Writes are serialized by the
//! cache lock, so the file always matches a state the cache went through.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use gymbro_core::error::Result;
use gymbro_core::user::{Max, UserRepository};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tokio::sync::Mutex;

const USERS_FILE: &str = "users.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredUser {
    #[serde(default)]
    active: bool,
    /// Keyed by exercise ID
    #[serde(default)]
    maxes: BTreeMap<i64, Max>,
}

type UserTable = HashMap<String, StoredUser>;

pub struct JsonUserRepository {
    file: AtomicJsonFile<UserTable>,
    users: Mutex<UserTable>,
}

impl JsonUserRepository {
    /// Opens `base_dir/users.json`, starting empty when it does not exist.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let file = AtomicJsonFile::new(base_dir.as_ref().join(USERS_FILE));
        let users = file.load().await?.unwrap_or_default();
        Ok(Self {
            file,
            users: Mutex::new(users),
        })
    }

    async fn modify<F>(&self, user_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut StoredUser) + Send,
    {
        let mut users = self.users.lock().await;
        let mut next = users.clone();
        f(next.entry(user_id.to_string()).or_default());

        // Cache only advances once the file has
        self.file.save(&next).await?;
        *users = next;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn set_active(&self, user_id: &str, active: bool) -> Result<()> {
        self.modify(user_id, |user| user.active = active).await
    }

    async fn is_active(&self, user_id: &str) -> Result<bool> {
        let users = self.users.lock().await;
        Ok(users.get(user_id).map(|u| u.active).unwrap_or(false))
    }

    async fn find_max(&self, user_id: &str, exercise_id: i64) -> Result<Option<Max>> {
        let users = self.users.lock().await;
        Ok(users
            .get(user_id)
            .and_then(|u| u.maxes.get(&exercise_id))
            .cloned())
    }

    async fn list_maxes(&self, user_id: &str) -> Result<Vec<Max>> {
        let users = self.users.lock().await;
        Ok(users
            .get(user_id)
            .map(|u| u.maxes.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_max(&self, max: &Max) -> Result<()> {
        let max = max.clone();
        let user_id = max.user_id.clone();
        self.modify(&user_id, move |user| {
            user.maxes.insert(max.exercise_id, max);
        })
        .await
    }
}
