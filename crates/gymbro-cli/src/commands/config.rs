use anyhow::Result;
use std::path::PathBuf;

pub async fn show(config_path: Option<PathBuf>) -> Result<()> {
    let (config_service, config) = super::load_config(config_path).await?;
    // Reject settings the engine would refuse at startup
    config.engine_settings()?;

    println!("# {}", config_service.path().display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
