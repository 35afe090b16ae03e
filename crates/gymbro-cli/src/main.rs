use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod wiring;

#[derive(Parser)]
#[command(name = "gymbro")]
#[command(about = "GYMBRO - workout session engine", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to $GYMBRO_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reclamation scheduler until Ctrl-C
    Run,
    /// Print the effective configuration
    Config,
    /// List a user's completed workouts from the history directory
    History {
        /// User ID
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => commands::run::run(cli.config).await?,
        Commands::Config => commands::config::show(cli.config).await?,
        Commands::History { user_id } => commands::history::list(cli.config, &user_id).await?,
    }

    Ok(())
}
