//! Omok library - five-in-a-row rules, turn state machine and move oracles
//!
//! The game can be played by two local players or against a generative
//! model acting as a move oracle.
//!
//! # Architecture
//!
//! - **Games**: board model, rules engine and the [`Game`] state machine
//! - **Oracle**: the [`MoveOracle`] boundary, reply parsing and validation
//! - **Orchestrator**: async driver serialising local input and oracle replies
//! - **TUI**: terminal presentation built on [`GameView`] snapshots
//!
//! # Example
//!
//! ```
//! use omok::{Game, GameMode, GameStatus, Move, Player, Rules};
//!
//! let mut game = Game::new(Rules::default(), GameMode::LocalTwoPlayer);
//! for col in 3..7 {
//!     game.play(Move::new(7, col)).unwrap(); // Black
//!     game.play(Move::new(8, col)).unwrap(); // White
//! }
//! game.play(Move::new(7, 7)).unwrap();
//! assert_eq!(game.status(), GameStatus::Won(Player::Black));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cli;
mod config;
mod error;
mod games;
mod llm_client;
mod oracle;
mod orchestrator;
mod tui;

// Crate-level exports - Command line
pub use cli::{Cli, Command as CliCommand, ModeArg};

// Crate-level exports - Configuration
pub use config::{ConfigError, GameSettings, OmokConfig, OracleSettings};

// Crate-level exports - Errors
pub use error::{BoardError, OracleError, OracleErrorKind};

// Crate-level exports - Game types
pub use games::omok::{
    Accepted, BOARD_SIZE, Board, Cell, Game, GameMode, GameStatus, GameView, Move, Phase, Placement,
    Player, Rejection, ReplyOutcome, Rules, WIN_LENGTH, rules,
};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Move oracles
pub use oracle::{
    FallbackReason, FirstEmptyOracle, LlmOracle, MoveOracle, OracleReply, OracleRequest,
    ResolvedMove, Ticket, parse_reply, resolve_move, system_prompt, user_prompt,
};

// Crate-level exports - Orchestration
pub use orchestrator::{Command, GameEvent, Orchestrator};

// Crate-level exports - Terminal UI
pub use tui::run_tui;
