//! Snapshot published to the presentation layer.

use super::game::Game;
use super::rules::winning_run;
use super::types::{GameMode, GameStatus, Move, Player, Rules};
use super::Board;
use serde::{Deserialize, Serialize};

/// Everything needed to render the game without reaching into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Board contents.
    pub board: Board,
    /// Board size and win length.
    pub rules: Rules,
    /// Current mode.
    pub mode: GameMode,
    /// Player to move (the winner's color once won).
    pub to_move: Player,
    /// In progress, won or drawn.
    pub status: GameStatus,
    /// Most recently accepted move.
    pub last_move: Option<Move>,
    /// True while an oracle request is outstanding.
    pub oracle_thinking: bool,
    /// Stones of the completed run, empty unless won.
    pub winning_run: Vec<Move>,
    /// Last non-fatal condition, e.g. an oracle failure.
    pub notice: Option<String>,
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        let status = game.status();
        let winning_run = match (status, game.last_move()) {
            (GameStatus::Won(_), Some(mv)) => winning_run(game.board(), mv, game.rules().win_length)
                .map(|(_, run)| run)
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        Self {
            board: game.board().clone(),
            rules: game.rules(),
            mode: game.mode(),
            to_move: game.to_move(),
            status,
            last_move: game.last_move(),
            oracle_thinking: game.is_oracle_thinking(),
            winning_run,
            notice: game.notice().map(str::to_string),
        }
    }
}
