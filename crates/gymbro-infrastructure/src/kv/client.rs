//! Key-value client abstraction.
//!
//! The minimal command set a shared key-value server must offer for the
//! Session Store to keep its invariants across instances: insert-if-absent,
//! compare-and-swap on the whole value, and a cursor-based key scan.

use async_trait::async_trait;
use gymbro_core::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The stored value matched and was replaced.
    Swapped,
    /// The stored value differed; nothing was written.
    Mismatch,
    /// The key did not exist; nothing was written.
    Missing,
}

/// One page of a key scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    pub keys: Vec<String>,
    /// Cursor for the next call; `0` once the scan is complete.
    pub next_cursor: u64,
}

#[async_trait]
pub trait KeyValueClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` only if `key` is absent. Returns `true` when written.
    async fn set_if_absent(&self, key: &str, value: String) -> Result<bool>;

    /// Replaces the value only if it still equals `expected`.
    async fn compare_and_swap(&self, key: &str, expected: &str, value: String)
    -> Result<CasOutcome>;

    /// Removes `key`. Returns `true` when something was deleted.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Returns up to `count` keys starting with `prefix`, resuming at `cursor`.
    ///
    /// A scan starts with cursor `0` and is complete when the returned
    /// cursor is `0` again.
    async fn scan(&self, cursor: u64, prefix: &str, count: usize) -> Result<ScanPage>;
}

/// In-process `KeyValueClient`.
///
/// Stands in for a shared server in tests and single-node deployments.
/// Cursors are offsets into the sorted key space.
#[derive(Clone, Default)]
pub struct MemoryKeyValueClient {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKeyValueClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueClient for MemoryKeyValueClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set_if_absent(&self, key: &str, value: String) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        Ok(true)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: &str,
        value: String,
    ) -> Result<CasOutcome> {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            None => Ok(CasOutcome::Missing),
            Some(current) if current.as_str() != expected => Ok(CasOutcome::Mismatch),
            Some(current) => {
                *current = value;
                Ok(CasOutcome::Swapped)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().await.remove(key).is_some())
    }

    async fn scan(&self, cursor: u64, prefix: &str, count: usize) -> Result<ScanPage> {
        let entries = self.entries.lock().await;
        let start = cursor as usize;
        let matching: Vec<&String> = entries.keys().filter(|k| k.starts_with(prefix)).collect();

        let end = (start + count.max(1)).min(matching.len());
        let keys = matching
            .get(start..end)
            .map(|page| page.iter().map(|k| (*k).clone()).collect())
            .unwrap_or_default();
        let next_cursor = if end >= matching.len() { 0 } else { end as u64 };

        Ok(ScanPage { keys, next_cursor })
    }
}
