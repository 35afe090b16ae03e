use crate::{logging, wiring};
use anyhow::{Context, Result};
use gymbro_application::ReclamationScheduler;
use std::path::PathBuf;

pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let (config_service, config) = super::load_config(config_path).await?;
    logging::init(&config);

    tracing::info!(
        path = %config_service.path().display(),
        env = %config.env,
        "GYMBRO v{}",
        env!("CARGO_PKG_VERSION")
    );

    let service = wiring::build_service(&config).await?;
    let scheduler = ReclamationScheduler::new(service).start();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    tracing::info!("Shutdown requested");

    scheduler.shutdown().await;
    Ok(())
}
