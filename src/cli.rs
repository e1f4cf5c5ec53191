//! Command-line interface for omok.

use crate::games::omok::GameMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Omok - five in a row against a generative move oracle or a friend
#[derive(Parser, Debug)]
#[command(name = "omok")]
#[command(about = "Five-in-a-row in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Opponent for White (overrides the config file)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Path to the configuration file
        #[arg(short, long, default_value = "omok.toml")]
        config: PathBuf,

        /// Use the offline first-empty-cell oracle instead of an LLM
        #[arg(long)]
        offline: bool,
    },

    /// Write a configuration file with default settings
    InitConfig {
        /// Where to write the file
        #[arg(short, long, default_value = "omok.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Game mode as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// White is played by the move oracle
    Oracle,
    /// Two players share the keyboard
    Local,
}

impl From<ModeArg> for GameMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Oracle => GameMode::OracleAssisted,
            ModeArg::Local => GameMode::LocalTwoPlayer,
        }
    }
}
