//! Path management for gymbro configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/gymbro/            # Config directory
//! └── config.toml              # Application configuration
//!
//! <storage.history_dir>/       # Only when configured
//! ├── users.json               # Active flags and personal records
//! └── workouts/                # Completed workouts, one file each
//! ```

use gymbro_core::error::{GymError, Result};
use std::path::PathBuf;

const APP_DIR: &str = "gymbro";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GYMBRO_CONFIG";

pub struct GymbroPaths;

impl GymbroPaths {
    /// Returns the platform config directory for gymbro.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| GymError::config("cannot determine config directory"))
    }

    /// Returns the default path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
