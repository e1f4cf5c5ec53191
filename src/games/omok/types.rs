//! Core domain types for five-in-a-row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default board side length.
pub const BOARD_SIZE: usize = 15;

/// Default run length needed to win.
pub const WIN_LENGTH: usize = 5;

/// Player (stone color) in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Player {
    /// Black (PlayerA, always moves first).
    Black,
    /// White (PlayerB).
    White,
}

impl Player {
    /// The fixed first mover of every game.
    pub const FIRST: Player = Player::Black;

    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Single-letter symbol used in oracle prompts.
    pub fn symbol(self) -> char {
        match self {
            Player::Black => 'B',
            Player::White => 'W',
        }
    }
}

/// A single intersection on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No stone.
    #[default]
    Empty,
    /// Stone of the given color.
    Occupied(Player),
}

impl Cell {
    /// Returns the stone color, if any.
    pub fn stone(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

/// A stone placement at `(row, col)`, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board geometry and winning condition for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Board side length N.
    pub size: usize,
    /// Minimum run length that wins.
    pub win_length: usize,
}

impl Rules {
    /// Creates a rule set.
    pub fn new(size: usize, win_length: usize) -> Self {
        Self { size, win_length }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(BOARD_SIZE, WIN_LENGTH)
    }
}

/// Who drives the second seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans sharing one input device.
    #[serde(rename = "local")]
    LocalTwoPlayer,
    /// White is played by the move oracle.
    #[default]
    #[serde(rename = "oracle")]
    OracleAssisted,
}

impl GameMode {
    /// Seat driven by the oracle in this mode.
    pub fn oracle_seat(self) -> Option<Player> {
        match self {
            GameMode::LocalTwoPlayer => None,
            GameMode::OracleAssisted => Some(Player::White),
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            GameMode::LocalTwoPlayer => GameMode::OracleAssisted,
            GameMode::OracleAssisted => GameMode::LocalTwoPlayer,
        }
    }

    /// Returns display name.
    pub fn name(&self) -> &str {
        match self {
            GameMode::LocalTwoPlayer => "Two players",
            GameMode::OracleAssisted => "Versus oracle",
        }
    }
}

/// Terminal status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Game is ongoing.
    InProgress,
    /// Game ended in a win.
    Won(Player),
    /// Board filled with no winner.
    Draw,
}

impl GameStatus {
    /// True for `Won` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}
