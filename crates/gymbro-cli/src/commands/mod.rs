pub mod config;
pub mod history;
pub mod run;

use anyhow::{Context, Result};
use gymbro_core::config::RootConfig;
use gymbro_infrastructure::ConfigService;
use std::path::PathBuf;

/// Resolves and loads the configuration file.
pub(crate) async fn load_config(explicit: Option<PathBuf>) -> Result<(ConfigService, RootConfig)> {
    let service = ConfigService::resolve(explicit)?;
    let config = service
        .load()
        .await
        .with_context(|| format!("Failed to load {}", service.path().display()))?;
    Ok((service, config))
}
