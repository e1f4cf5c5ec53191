//! Application state and logic.

use crate::games::omok::{Game, GameMode, GameStatus, GameView, Move, Rules};
use crate::oracle::FallbackReason;
use crate::orchestrator::GameEvent;
use crossterm::event::KeyCode;
use tracing::debug;

use super::input::move_cursor;

/// Main application state.
pub struct App {
    view: GameView,
    cursor: Move,
    status_message: String,
    oracle_name: String,
}

impl App {
    /// Creates a new application showing an empty board.
    pub fn new(rules: Rules, mode: GameMode, oracle_name: impl Into<String>) -> Self {
        let center = rules.size / 2;
        Self {
            view: Game::new(rules, mode).view(),
            cursor: Move::new(center, center),
            status_message: "Black to move.".to_string(),
            oracle_name: oracle_name.into(),
        }
    }

    /// Latest snapshot from the orchestrator.
    pub fn view(&self) -> &GameView {
        &self.view
    }

    /// Cell under the cursor.
    pub fn cursor(&self) -> Move {
        self.cursor
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Current mode.
    pub fn mode(&self) -> GameMode {
        self.view.mode
    }

    /// Moves the cursor.
    pub fn move_cursor(&mut self, key: KeyCode) {
        self.cursor = move_cursor(self.cursor, key, self.view.rules.size);
    }

    /// Handles a game event from the orchestrator.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::StateChanged(view) => self.view = view,
            GameEvent::GameReset { mode } => {
                self.status_message = format!("New game ({}). Black to move.", mode.name());
            }
            GameEvent::OracleThinking { .. } => {
                self.status_message = format!("{} is thinking...", self.oracle_name);
            }
            GameEvent::MoveMade {
                placement,
                by_oracle,
            } => {
                let who = if by_oracle {
                    format!("{} ({})", self.oracle_name, placement.player)
                } else {
                    placement.player.to_string()
                };
                self.status_message = match placement.fallback {
                    None => format!("{} played {}", who, placement.mv),
                    Some(FallbackReason::Occupied(mv)) => format!(
                        "{} picked occupied {}, played {} instead",
                        who, mv, placement.mv
                    ),
                    Some(FallbackReason::OutOfRange { row, col }) => format!(
                        "{} picked off-board ({}, {}), played {} instead",
                        who, row, col, placement.mv
                    ),
                };
            }
            GameEvent::OracleFailed {
                message,
                will_retry,
                ..
            } => {
                self.status_message = if will_retry {
                    format!("Oracle failed ({}). Asking again...", message)
                } else {
                    format!("Oracle failed ({}). Press 't' to retry or 'r' to restart.", message)
                };
            }
            GameEvent::ReplyDiscarded { ticket } => {
                debug!(%ticket, "Stale oracle reply dropped");
            }
            GameEvent::GameOver { status } => {
                self.status_message = match status {
                    GameStatus::Won(player) => {
                        format!("{} wins! Press 'r' to restart or 'q' to quit.", player)
                    }
                    GameStatus::Draw => {
                        "Game ended in a draw! Press 'r' to restart or 'q' to quit.".to_string()
                    }
                    GameStatus::InProgress => self.status_message.clone(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(mode: GameMode) -> App {
        App::new(Rules::default(), mode, "Oracle")
    }

    #[test]
    fn test_reset_before_any_move_announces_mode() {
        let mut app = app(GameMode::OracleAssisted);
        app.handle_event(GameEvent::GameReset {
            mode: GameMode::LocalTwoPlayer,
        });
        assert!(app.status_message().contains(GameMode::LocalTwoPlayer.name()));

        app.handle_event(GameEvent::GameReset {
            mode: GameMode::OracleAssisted,
        });
        assert!(app.status_message().contains(GameMode::OracleAssisted.name()));
    }

    #[test]
    fn test_state_change_keeps_status() {
        let mut app = app(GameMode::LocalTwoPlayer);
        let view = Game::new(Rules::default(), GameMode::OracleAssisted).view();
        app.handle_event(GameEvent::StateChanged(view));
        assert_eq!(app.status_message(), "Black to move.");
        assert_eq!(app.mode(), GameMode::OracleAssisted);
    }

    #[test]
    fn test_exhausted_failure_hints_retry_key() {
        let mut app = app(GameMode::OracleAssisted);
        app.handle_event(GameEvent::OracleFailed {
            ticket: crate::oracle::Ticket(1),
            message: "no reply within 60 seconds".to_string(),
            will_retry: false,
        });
        assert!(app.status_message().contains("'t'"));
    }
}
