//! Omok - Unified CLI
//!
//! Five-in-a-row in the terminal, against a move oracle or a second player.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use omok::{
    Cli, CliCommand, FirstEmptyOracle, GameMode, LlmClient, LlmOracle, ModeArg, MoveOracle,
    OmokConfig, run_tui,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        CliCommand::Play {
            mode,
            config,
            offline,
        } => run_play(mode, config, offline).await,
        CliCommand::InitConfig { path, force } => init_config(path, force),
    }
}

/// Run the terminal game
async fn run_play(mode: Option<ModeArg>, config: PathBuf, offline: bool) -> Result<()> {
    let mut config = OmokConfig::load_or_default(&config)
        .with_context(|| format!("Failed to load {}", config.display()))?;
    if let Some(mode) = mode {
        config = config.with_mode(mode.into());
    }

    let oracle = build_oracle(&config, offline)?;
    run_tui(config, oracle).await
}

/// Picks the oracle for White.
fn build_oracle(config: &OmokConfig, offline: bool) -> Result<Arc<dyn MoveOracle>> {
    if offline {
        return Ok(Arc::new(FirstEmptyOracle::default()));
    }

    match config.create_llm_config() {
        Ok(llm_config) => {
            let name = config.oracle().model().clone();
            Ok(Arc::new(LlmOracle::new(name, LlmClient::new(llm_config))))
        }
        // Local play never consults the oracle unless the mode is switched.
        Err(e) if *config.game().mode() == GameMode::LocalTwoPlayer => {
            eprintln!("{}; oracle mode will use the offline oracle", e.message);
            Ok(Arc::new(FirstEmptyOracle::default()))
        }
        Err(e) => Err(e).context("No LLM oracle available; set the API key or pass --offline"),
    }
}

/// Write the default configuration
#[instrument(skip_all, fields(path = %path.display()))]
fn init_config(path: PathBuf, force: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if path.exists() && !force {
        warn!("Config file already exists");
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    OmokConfig::default().write(&path)?;
    info!("Default configuration written");
    println!("Wrote {}", path.display());
    Ok(())
}
