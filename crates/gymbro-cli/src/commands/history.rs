use anyhow::{Result, bail};
use gymbro_core::workout::WorkoutRepository;
use gymbro_infrastructure::AsyncDirWorkoutRepository;
use std::path::PathBuf;

pub async fn list(config_path: Option<PathBuf>, user_id: &str) -> Result<()> {
    let (_, config) = super::load_config(config_path).await?;
    let Some(dir) = config.storage.history_dir else {
        bail!("storage.history_dir is not set; history is kept in memory only");
    };

    let repository = AsyncDirWorkoutRepository::new(&dir).await?;
    let workouts = repository.list_by_user(user_id).await?;

    if workouts.is_empty() {
        println!("No workouts for {}", user_id);
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&workouts)?);
    Ok(())
}
