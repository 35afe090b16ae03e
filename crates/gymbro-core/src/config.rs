//! Configuration model.
//!
//! `RootConfig` mirrors the on-disk `config.toml`. Every field has a serde
//! default so a partial (or missing) file still yields a usable config.
//! The engine itself only ever sees [`EngineSettings`].

use crate::error::{GymError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumString};

/// Deployment environment; selects the log format.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Production,
}

/// Which Session Store backend to wire up.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SessionBackend {
    /// Single-process map guarded by one mutex.
    #[default]
    Memory,
    /// Key-value backend with conditional writes.
    Kv,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            env: Environment::default(),
            log_level: default_log_level(),
            engine: EngineConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seconds between reclamation sweeps.
    #[serde(default = "default_scheduler_interval_secs")]
    pub scheduler_interval_secs: u64,
    /// Seconds without a mutation before a session is force-ended.
    #[serde(default = "default_session_lifetime_secs")]
    pub session_lifetime_secs: u64,
    #[serde(default = "default_personal_record_bonus")]
    pub personal_record_bonus: i64,
    #[serde(default = "default_scoring_base")]
    pub scoring_base: i64,
    /// Seconds a reconciliation may hold a sealed session before another
    /// End or sweep may take it over.
    #[serde(default = "default_seal_lease_secs")]
    pub seal_lease_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scheduler_interval_secs: default_scheduler_interval_secs(),
            session_lifetime_secs: default_session_lifetime_secs(),
            personal_record_bonus: default_personal_record_bonus(),
            scoring_base: default_scoring_base(),
            seal_lease_secs: default_seal_lease_secs(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub session_backend: SessionBackend,
    /// Directory for durable workout history. In-memory history when unset.
    #[serde(default)]
    pub history_dir: Option<std::path::PathBuf>,
}

impl RootConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Converts the `[engine]` section into validated runtime settings.
    ///
    /// # Errors
    ///
    /// Returns `GymError::Config` for a zero interval, lifetime or lease, or
    /// for a non-positive scoring base.
    pub fn engine_settings(&self) -> Result<EngineSettings> {
        let engine = &self.engine;
        if engine.scheduler_interval_secs == 0 {
            return Err(GymError::config("engine.scheduler_interval_secs must be > 0"));
        }
        if engine.session_lifetime_secs == 0 {
            return Err(GymError::config("engine.session_lifetime_secs must be > 0"));
        }
        if engine.seal_lease_secs == 0 {
            return Err(GymError::config("engine.seal_lease_secs must be > 0"));
        }
        if engine.scoring_base <= 0 {
            return Err(GymError::config("engine.scoring_base must be > 0"));
        }

        Ok(EngineSettings {
            scheduler_interval: Duration::from_secs(engine.scheduler_interval_secs),
            inactivity_timeout: Duration::from_secs(engine.session_lifetime_secs),
            personal_record_bonus: engine.personal_record_bonus,
            scoring_base: engine.scoring_base,
            seal_lease: Duration::from_secs(engine.seal_lease_secs),
        })
    }
}

/// Runtime settings consumed by the session engine and the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub scheduler_interval: Duration,
    pub inactivity_timeout: Duration,
    pub personal_record_bonus: i64,
    pub scoring_base: i64,
    pub seal_lease: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            scheduler_interval: Duration::from_secs(default_scheduler_interval_secs()),
            inactivity_timeout: Duration::from_secs(default_session_lifetime_secs()),
            personal_record_bonus: default_personal_record_bonus(),
            scoring_base: default_scoring_base(),
            seal_lease: Duration::from_secs(default_seal_lease_secs()),
        }
    }
}

// ============================================================================
// Serde defaults
// ============================================================================

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scheduler_interval_secs() -> u64 {
    60
}

fn default_session_lifetime_secs() -> u64 {
    30 * 60
}

fn default_personal_record_bonus() -> i64 {
    50
}

fn default_scoring_base() -> i64 {
    100
}

fn default_seal_lease_secs() -> u64 {
    5 * 60
}
