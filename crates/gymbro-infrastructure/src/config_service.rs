//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`. The file location is
//! resolved once, in order: an explicit path, the `GYMBRO_CONFIG`
//! environment variable, then `~/.config/gymbro/config.toml`.

use crate::paths::{CONFIG_ENV_VAR, GymbroPaths};
use gymbro_core::config::RootConfig;
use gymbro_core::error::{GymError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service reading a specific file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a service using the standard resolution order.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        Ok(Self::new(Self::resolve_path(explicit, from_env)?))
    }

    fn resolve_path(explicit: Option<PathBuf>, from_env: Option<PathBuf>) -> Result<PathBuf> {
        match explicit.or(from_env) {
            Some(path) => Ok(path),
            None => GymbroPaths::config_file(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file yields `RootConfig::default()`; an unreadable or
    /// malformed one is a `GymError::Config`.
    pub async fn load(&self) -> Result<RootConfig> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                tracing::debug!(path = %self.path.display(), "Loaded config file");
                RootConfig::from_toml_str(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.path.display(),
                    "Config file not found, using defaults"
                );
                Ok(RootConfig::default())
            }
            Err(e) => Err(GymError::config(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymbro_core::config::SessionBackend;

    #[test]
    fn test_explicit_path_wins_over_env() {
        let path = ConfigService::resolve_path(
            Some(PathBuf::from("/tmp/a.toml")),
            Some(PathBuf::from("/tmp/b.toml")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a.toml"));

        let path = ConfigService::resolve_path(None, Some(PathBuf::from("/tmp/b.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/b.toml"));
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let service = ConfigService::new(temp_dir.path().join("config.toml"));

        assert_eq!(service.load().await.unwrap(), RootConfig::default());
    }

    #[tokio::test]
    async fn test_loads_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nsession_backend = \"kv\"\n").unwrap();

        let config = ConfigService::new(&path).load().await.unwrap();
        assert_eq!(config.storage.session_backend, SessionBackend::Kv);
    }

    #[tokio::test]
    async fn test_malformed_file_is_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[engine\n").unwrap();

        let err = ConfigService::new(&path).load().await.unwrap_err();
        assert!(matches!(err, GymError::Config(_)));
    }
}
