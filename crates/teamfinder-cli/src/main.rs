use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use teamfinder_core::config::BackendKind;
use teamfinder_core::gateway::RecordStore;
use teamfinder_infrastructure::{ConfigService, TeamfinderPaths, build_gateway};

mod commands;
mod logging;
mod render;
mod shell;

#[derive(Parser)]
#[command(name = "teamfinder")]
#[command(about = "TeamFinder - discover hackathon teammates by skill and category", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend to use, overriding config and environment
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell,
    /// Print the directory once, filtered
    Browse {
        /// Case-insensitive text matched against username, full name and bio
        #[arg(long)]
        search: Option<String>,
        /// Required skill (id or name); repeat to require several
        #[arg(long = "skill")]
        skills: Vec<String>,
        /// Only profiles with a skill in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the resolved configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = TeamfinderPaths::default();

    // Keeps the background log writer alive until exit.
    let _log_guard = match paths.logs_dir() {
        Ok(dir) => logging::init(&dir),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    let config_service =
        ConfigService::new(cli.config.as_deref()).context("Failed to locate config file")?;
    let mut config = config_service
        .load()
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    tracing::info!(backend = %config.backend, "Starting TeamFinder");

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(&config_service),
            ConfigAction::Show => commands::config::show(&config)?,
        },
        Commands::Browse {
            search,
            skills,
            category,
        } => {
            let store = RecordStore::new(build_gateway(&config)?);
            commands::browse::run(store, search, skills, category).await?;
        }
        Commands::Shell => {
            let store = RecordStore::new(build_gateway(&config)?);
            let history = paths.history_file().ok();
            shell::Shell::new(store, config.backend).run(history).await?;
        }
    }

    Ok(())
}
