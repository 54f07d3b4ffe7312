//! Craftmind CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Interactive sandbox session against the simulated world
//! - `actions` — Print the action schema sent to the reasoner

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "craftmind",
    about = "Craftmind — a game-world companion agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "craftmind.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a sandbox session: your typed lines become in-world chat
    Run {
        /// Username your typed lines are attributed to
        #[arg(short, long, default_value = "alice")]
        player: String,
    },

    /// Print the derived action schema as JSON
    Actions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { player } => commands::run::run(&cli.config, player).await?,
        Commands::Actions => commands::actions::run(&cli.config).await?,
    }

    Ok(())
}
