//! Async driver around the game state machine.
//!
//! One task owns the [`Game`]. Local commands and oracle replies arrive on
//! channels and are applied one at a time, so an in-flight oracle reply
//! can never race a local move. Oracle requests run on spawned tasks and
//! report back with their ticket; replies for abandoned tickets are dropped
//! by the game itself.

use crate::config::OracleSettings;
use crate::error::{OracleError, OracleErrorKind};
use crate::games::omok::{Game, GameMode, GameStatus, GameView, Move, Placement, ReplyOutcome};
use crate::oracle::{MoveOracle, OracleReply, OracleRequest, Ticket};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Place a stone for the local player to move.
    Play(Move),
    /// Start over, optionally in another mode.
    Reset(Option<GameMode>),
    /// Ask the oracle again after a failed turn.
    RetryOracle,
    /// Stop the driver.
    Shutdown,
}

/// Messages sent from orchestrator to UI.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Game state updated.
    StateChanged(GameView),
    /// Board cleared for a new game.
    GameReset {
        /// Mode of the new game.
        mode: GameMode,
    },
    /// Oracle request sent.
    OracleThinking {
        /// Request stamp.
        ticket: Ticket,
    },
    /// A stone was placed.
    MoveMade {
        /// The placed stone.
        placement: Placement,
        /// True when the oracle chose it.
        by_oracle: bool,
    },
    /// Oracle turn produced no stone.
    OracleFailed {
        /// Request stamp.
        ticket: Ticket,
        /// What went wrong.
        message: String,
        /// True when another request goes out automatically.
        will_retry: bool,
    },
    /// Reply arrived for a request that is no longer outstanding.
    ReplyDiscarded {
        /// Request stamp.
        ticket: Ticket,
    },
    /// Game ended.
    GameOver {
        /// Won or drawn.
        status: GameStatus,
    },
}

/// Oracle answer routed back to the driver.
struct OracleOutcome {
    ticket: Ticket,
    result: Result<OracleReply, OracleError>,
}

/// Drives one game between local input and a move oracle.
pub struct Orchestrator {
    game: Game,
    oracle: Arc<dyn MoveOracle>,
    settings: OracleSettings,
    event_tx: mpsc::UnboundedSender<GameEvent>,
    reply_tx: mpsc::UnboundedSender<OracleOutcome>,
    reply_rx: mpsc::UnboundedReceiver<OracleOutcome>,
    retries_used: u32,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        game: Game,
        oracle: Arc<dyn MoveOracle>,
        settings: OracleSettings,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            game,
            oracle,
            settings,
            event_tx,
            reply_tx,
            reply_rx,
            retries_used: 0,
        }
    }

    /// Returns the game.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs the driver on a new task, returning its command sender.
    pub fn spawn(self) -> (mpsc::UnboundedSender<Command>, JoinHandle<Result<()>>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(self.run(command_rx));
        (command_tx, handle)
    }

    /// Runs the game loop until shutdown or until the command channel closes.
    #[instrument(skip_all, fields(oracle = %self.oracle.name()))]
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<()> {
        info!("Starting game orchestration");
        self.publish_state()?;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command)?,
                },
                Some(outcome) = self.reply_rx.recv() => self.handle_reply(outcome)?,
            }
        }

        info!("Game orchestration stopped");
        Ok(())
    }

    fn handle_command(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Handling command");
        match command {
            Command::Play(mv) => match self.game.play(mv) {
                Ok(accepted) => {
                    self.announce_placement(accepted.placement, false)?;
                    if let Some(request) = accepted.oracle_request {
                        self.retries_used = 0;
                        self.dispatch(request)?;
                    }
                }
                Err(reason) => debug!(%mv, %reason, "Ignoring local move"),
            },
            Command::Reset(mode) => {
                self.game.reset(mode);
                self.retries_used = 0;
                self.send(GameEvent::GameReset {
                    mode: self.game.mode(),
                })?;
                self.publish_state()?;
            }
            Command::RetryOracle => match self.game.request_oracle_move() {
                Some(request) => {
                    info!(ticket = %request.ticket, "Retrying oracle turn on request");
                    self.retries_used = 0;
                    self.dispatch(request)?;
                }
                None => debug!("No oracle turn to retry"),
            },
            Command::Shutdown => {}
        }
        Ok(())
    }

    fn handle_reply(&mut self, outcome: OracleOutcome) -> Result<()> {
        let OracleOutcome { ticket, result } = outcome;
        match self.game.apply_oracle_reply(ticket, result) {
            ReplyOutcome::Stale(ticket) => {
                self.send(GameEvent::ReplyDiscarded { ticket })?;
            }
            ReplyOutcome::Placed(placement) => {
                self.announce_placement(placement, true)?;
            }
            ReplyOutcome::Failed(error) => {
                let will_retry = self.retries_used < *self.settings.max_retries();
                warn!(%ticket, error = %error.kind, will_retry, "Oracle turn failed");
                self.send(GameEvent::OracleFailed {
                    ticket,
                    message: error.kind.to_string(),
                    will_retry,
                })?;

                if will_retry {
                    self.retries_used += 1;
                    if let Some(request) = self.game.request_oracle_move() {
                        return self.dispatch(request);
                    }
                }
                self.publish_state()?;
            }
        }
        Ok(())
    }

    fn announce_placement(&mut self, placement: Placement, by_oracle: bool) -> Result<()> {
        let status = placement.status;
        self.send(GameEvent::MoveMade {
            placement,
            by_oracle,
        })?;
        self.publish_state()?;
        if status.is_terminal() {
            info!(?status, "Game over");
            self.send(GameEvent::GameOver { status })?;
        }
        Ok(())
    }

    /// Publishes the thinking state and starts the request on its own task.
    fn dispatch(&mut self, request: OracleRequest) -> Result<()> {
        let ticket = request.ticket;
        self.send(GameEvent::OracleThinking { ticket })?;
        self.publish_state()?;

        let oracle = Arc::clone(&self.oracle);
        let reply_tx = self.reply_tx.clone();
        let delay = self.settings.think_delay();
        let timeout = self.settings.timeout();
        let timeout_secs = *self.settings.timeout_secs();

        debug!(%ticket, ?delay, ?timeout, "Dispatching oracle request");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = match tokio::time::timeout(timeout, oracle.suggest_move(&request)).await {
                Ok(result) => result,
                Err(_) => Err(OracleError::new(OracleErrorKind::Timeout(timeout_secs))),
            };
            // Driver gone means the game is over; nothing left to deliver to.
            let _ = reply_tx.send(OracleOutcome { ticket, result });
        });
        Ok(())
    }

    fn publish_state(&self) -> Result<()> {
        self.send(GameEvent::StateChanged(self.game.view()))
    }

    fn send(&self, event: GameEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("UI event channel closed")
    }
}
