//! Turn state machine for five-in-a-row.
//!
//! [`Game`] is synchronous and owns no I/O. Local moves go in through
//! [`Game::play`]; when the oracle seat is to move the game hands out an
//! [`OracleRequest`] and waits in [`Phase::OracleThinking`] until the
//! matching reply comes back through [`Game::apply_oracle_reply`].

use super::rules::{detect_winner, is_full};
use super::types::{GameMode, GameStatus, Move, Player, Rules};
use super::view::GameView;
use super::Board;
use crate::error::OracleError;
use crate::oracle::{FallbackReason, OracleReply, OracleRequest, Ticket, resolve_move};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Where the state machine currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the player to move.
    AwaitingMove,
    /// An oracle request is in flight.
    OracleThinking(Ticket),
    /// Terminal: a player completed a run.
    Won(Player),
    /// Terminal: the board filled with no winner.
    Drawn,
}

/// Why a local move was ignored.
///
/// Illegal local input is a no-op, not an error; this only says which
/// guard stopped it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Rejection {
    /// Game already won or drawn.
    GameOver,
    /// Oracle request outstanding.
    OracleThinking,
    /// The oracle seat is to move.
    NotYourTurn,
    /// Coordinate outside the board.
    OffBoard,
    /// Cell already holds a stone.
    Occupied,
}

/// A stone that was written to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Who played.
    pub player: Player,
    /// Where.
    pub mv: Move,
    /// Set when an oracle suggestion was replaced by the fallback cell.
    pub fallback: Option<FallbackReason>,
    /// Game status right after the stone landed.
    pub status: GameStatus,
}

/// Result of an accepted local move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// The placed stone.
    pub placement: Placement,
    /// Request to send when the move handed the turn to the oracle.
    pub oracle_request: Option<OracleRequest>,
}

/// What happened to an oracle reply.
#[derive(Debug, Clone)]
pub enum ReplyOutcome {
    /// No request with this ticket is outstanding; nothing changed.
    Stale(Ticket),
    /// A stone was placed for the oracle.
    Placed(Placement),
    /// No stone placed; the oracle's turn is still pending.
    Failed(OracleError),
}

/// Five-in-a-row game state machine.
#[derive(Debug, Clone)]
pub struct Game {
    rules: Rules,
    mode: GameMode,
    board: Board,
    to_move: Player,
    phase: Phase,
    last_move: Option<Move>,
    last_ticket: u64,
    notice: Option<String>,
}

impl Game {
    /// Creates a new game with an empty board and Black to move.
    #[instrument]
    pub fn new(rules: Rules, mode: GameMode) -> Self {
        Self {
            rules,
            mode,
            board: Board::new(rules.size),
            to_move: Player::FIRST,
            phase: Phase::AwaitingMove,
            last_move: None,
            last_ticket: 0,
            notice: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the rules.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the player to move.
    pub fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the most recently accepted move.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Returns the last non-fatal condition worth showing, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        match self.phase {
            Phase::Won(player) => GameStatus::Won(player),
            Phase::Drawn => GameStatus::Draw,
            Phase::AwaitingMove | Phase::OracleThinking(_) => GameStatus::InProgress,
        }
    }

    /// True while an oracle request is outstanding.
    pub fn is_oracle_thinking(&self) -> bool {
        matches!(self.phase, Phase::OracleThinking(_))
    }

    /// True when the oracle seat is to move in oracle mode.
    pub fn is_oracle_turn(&self) -> bool {
        self.mode.oracle_seat() == Some(self.to_move)
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> GameView {
        GameView::from(self)
    }

    /// Returns to the initial state with a fresh board.
    ///
    /// Passing a mode switches to it. Any outstanding oracle request
    /// becomes stale.
    #[instrument(skip(self), fields(current_mode = ?self.mode))]
    pub fn reset(&mut self, mode: Option<GameMode>) {
        if let Phase::OracleThinking(ticket) = self.phase {
            debug!(%ticket, "Abandoning outstanding oracle request");
        }
        self.mode = mode.unwrap_or(self.mode);
        self.board = Board::new(self.rules.size);
        self.to_move = Player::FIRST;
        self.phase = Phase::AwaitingMove;
        self.last_move = None;
        self.notice = None;
        info!(mode = ?self.mode, "Game reset");
    }

    /// Plays a local move for the player to move.
    ///
    /// When the move hands the turn to the oracle, the game enters
    /// [`Phase::OracleThinking`] and the request to send is returned.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn play(&mut self, mv: Move) -> Result<Accepted, Rejection> {
        match self.phase {
            Phase::Won(_) | Phase::Drawn => return Err(Rejection::GameOver),
            Phase::OracleThinking(_) => return Err(Rejection::OracleThinking),
            Phase::AwaitingMove => {}
        }
        if self.is_oracle_turn() {
            return Err(Rejection::NotYourTurn);
        }
        if !self.board.contains(mv) {
            return Err(Rejection::OffBoard);
        }
        if !self.board.is_empty(mv) {
            return Err(Rejection::Occupied);
        }

        let placement = self.place(mv, None);
        let oracle_request = self.request_oracle_move();
        Ok(Accepted {
            placement,
            oracle_request,
        })
    }

    /// Starts an oracle turn if one is due and none is outstanding.
    ///
    /// Used after a local move and to retry after an oracle failure.
    #[instrument(skip(self))]
    pub fn request_oracle_move(&mut self) -> Option<OracleRequest> {
        if self.phase != Phase::AwaitingMove || !self.is_oracle_turn() {
            return None;
        }

        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);
        self.phase = Phase::OracleThinking(ticket);
        self.notice = None;
        info!(%ticket, color = %self.to_move, "Oracle turn started");

        Some(OracleRequest {
            ticket,
            board: self.board.clone(),
            rules: self.rules,
            color: self.to_move,
        })
    }

    /// Applies the oracle's answer to the request stamped `ticket`.
    ///
    /// Replies for any other ticket are discarded. Errors leave the board
    /// untouched with the oracle's turn still pending. Illegal coordinates
    /// are replaced by the first empty cell.
    #[instrument(skip(self, result), fields(ok = result.is_ok()))]
    pub fn apply_oracle_reply(
        &mut self,
        ticket: Ticket,
        result: Result<OracleReply, OracleError>,
    ) -> ReplyOutcome {
        if self.phase != Phase::OracleThinking(ticket) {
            debug!(%ticket, phase = ?self.phase, "Discarding stale oracle reply");
            return ReplyOutcome::Stale(ticket);
        }

        let resolved = result.and_then(|reply| {
            if let Some(reasoning) = &reply.reasoning {
                debug!(%reasoning, "Oracle rationale");
            }
            resolve_move(&self.board, &reply)
        });

        match resolved {
            Ok(resolved) => ReplyOutcome::Placed(self.place(resolved.mv, resolved.fallback)),
            Err(error) => {
                warn!(%ticket, error = %error.kind, "Oracle turn failed, no stone placed");
                self.phase = Phase::AwaitingMove;
                self.notice = Some(format!("Oracle failed: {}", error.kind));
                ReplyOutcome::Failed(error)
            }
        }
    }

    /// Writes a stone for the player to move and evaluates the result.
    fn place(&mut self, mv: Move, fallback: Option<FallbackReason>) -> Placement {
        let player = self.to_move;
        self.board.place(mv, player);
        self.last_move = Some(mv);

        if let Some(winner) = detect_winner(&self.board, mv, self.rules.win_length) {
            info!(%winner, %mv, "Game won");
            self.phase = Phase::Won(winner);
        } else if is_full(&self.board) {
            info!(%mv, "Board full, game drawn");
            self.phase = Phase::Drawn;
        } else {
            self.to_move = player.opponent();
            self.phase = Phase::AwaitingMove;
        }

        debug!(%player, %mv, ?fallback, "Stone placed");
        Placement {
            player,
            mv,
            fallback,
            status: self.status(),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default(), GameMode::default())
    }
}
