//! Key-value backed Session Store.
//!
//! - `client`: the `KeyValueClient` command set and an in-process client
//! - `session_store`: `KvSessionStore`, the `SessionStore` built on top

mod client;
mod session_store;

pub use client::{CasOutcome, KeyValueClient, MemoryKeyValueClient, ScanPage};
pub use session_store::{DEFAULT_KEY_PREFIX, KvSessionStore};
