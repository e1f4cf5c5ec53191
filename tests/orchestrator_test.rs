//! Tests for the async game driver with scripted oracles.

use omok::{
    Command, FirstEmptyOracle, Game, GameEvent, GameMode, GameStatus, Move, MoveOracle,
    OracleError, OracleErrorKind, OracleReply, OracleRequest, OracleSettings, Orchestrator,
    Player, Rules,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;

/// One scripted oracle answer.
enum Step {
    Reply(i64, i64),
    Fail,
    Hang,
}

struct ScriptedOracle {
    steps: Mutex<VecDeque<Step>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl ScriptedOracle {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn gated(steps: Vec<Step>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(steps)
        }
    }
}

#[async_trait::async_trait]
impl MoveOracle for ScriptedOracle {
    async fn suggest_move(&self, _request: &OracleRequest) -> Result<OracleReply, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(row, col)) => Ok(OracleReply::new(row, col)),
            Some(Step::Fail) | None => Err(OracleError::new(OracleErrorKind::Transport(
                "scripted failure".to_string(),
            ))),
            Some(Step::Hang) => std::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

struct Harness {
    commands: mpsc::UnboundedSender<Command>,
    events: mpsc::UnboundedReceiver<GameEvent>,
    handle: JoinHandle<anyhow::Result<()>>,
}

impl Harness {
    fn start(mode: GameMode, oracle: Arc<dyn MoveOracle>, settings: OracleSettings) -> Self {
        let (event_tx, events) = mpsc::unbounded_channel();
        let game = Game::new(Rules::default(), mode);
        let orchestrator = Orchestrator::new(game, oracle, settings, event_tx);
        let (commands, handle) = orchestrator.spawn();
        Self {
            commands,
            events,
            handle,
        }
    }

    fn send(&self, command: Command) {
        self.commands.send(command).unwrap();
    }

    /// Collects events up to and including the first one matching `pred`.
    async fn wait_for(&mut self, pred: impl Fn(&GameEvent) -> bool) -> Vec<GameEvent> {
        let mut seen = Vec::new();
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), self.events.recv())
                .await
                .expect("timed out waiting for event")
                .expect("event channel closed");
            let done = pred(&event);
            seen.push(event);
            if done {
                return seen;
            }
        }
    }

    async fn shutdown(self) {
        self.send(Command::Shutdown);
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("driver did not stop")
            .expect("driver panicked");
        assert!(result.is_ok());
    }
}

fn fast_settings() -> OracleSettings {
    OracleSettings::default().with_think_delay_ms(0)
}

fn oracle_move(event: &GameEvent) -> Option<Move> {
    match event {
        GameEvent::MoveMade {
            placement,
            by_oracle: true,
        } => Some(placement.mv),
        _ => None,
    }
}

#[tokio::test]
async fn test_oracle_answers_after_local_move() {
    let oracle = Arc::new(ScriptedOracle::new(vec![Step::Reply(7, 8)]));
    let mut harness = Harness::start(GameMode::OracleAssisted, oracle.clone(), fast_settings());

    harness.send(Command::Play(Move::new(7, 7)));
    let events = harness.wait_for(|e| oracle_move(e).is_some()).await;

    assert!(events.iter().any(|e| matches!(e, GameEvent::OracleThinking { .. })));
    assert_eq!(oracle_move(events.last().unwrap()), Some(Move::new(7, 8)));

    let events = harness
        .wait_for(|e| matches!(e, GameEvent::StateChanged(_)))
        .await;
    let GameEvent::StateChanged(view) = events.last().unwrap() else {
        unreachable!()
    };
    assert_eq!(view.to_move, Player::Black);
    assert!(!view.oracle_thinking);
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_reply_after_reset_is_discarded() {
    let gate = Arc::new(Notify::new());
    let oracle = Arc::new(ScriptedOracle::gated(vec![Step::Reply(0, 0)], gate.clone()));
    let mut harness = Harness::start(GameMode::OracleAssisted, oracle, fast_settings());

    harness.send(Command::Play(Move::new(7, 7)));
    let events = harness
        .wait_for(|e| matches!(e, GameEvent::OracleThinking { .. }))
        .await;
    let Some(GameEvent::OracleThinking { ticket }) = events.last().cloned() else {
        unreachable!()
    };

    harness.send(Command::Reset(None));
    harness
        .wait_for(|e| matches!(e, GameEvent::StateChanged(v) if v.last_move.is_none()))
        .await;

    gate.notify_one();
    let events = harness
        .wait_for(|e| matches!(e, GameEvent::ReplyDiscarded { .. }))
        .await;

    assert!(matches!(events.last(), Some(GameEvent::ReplyDiscarded { ticket: t }) if *t == ticket));
    assert!(events.iter().all(|e| !matches!(e, GameEvent::MoveMade { .. })));

    harness.shutdown().await;
}

#[tokio::test]
async fn test_failure_retried_automatically() {
    let oracle = Arc::new(ScriptedOracle::new(vec![Step::Fail, Step::Reply(0, 0)]));
    let settings = fast_settings().with_max_retries(1);
    let mut harness = Harness::start(GameMode::OracleAssisted, oracle.clone(), settings);

    harness.send(Command::Play(Move::new(7, 7)));
    let events = harness.wait_for(|e| oracle_move(e).is_some()).await;

    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::OracleFailed {
            will_retry: true,
            ..
        }
    )));
    assert_eq!(oracle_move(events.last().unwrap()), Some(Move::new(0, 0)));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_exhausted_retries_wait_for_manual_retry() {
    let oracle = Arc::new(ScriptedOracle::new(vec![Step::Fail, Step::Reply(3, 3)]));
    let settings = fast_settings().with_max_retries(0);
    let mut harness = Harness::start(GameMode::OracleAssisted, oracle.clone(), settings);

    harness.send(Command::Play(Move::new(7, 7)));
    harness
        .wait_for(|e| {
            matches!(
                e,
                GameEvent::OracleFailed {
                    will_retry: false,
                    ..
                }
            )
        })
        .await;

    let events = harness
        .wait_for(|e| matches!(e, GameEvent::StateChanged(_)))
        .await;
    let GameEvent::StateChanged(view) = events.last().unwrap() else {
        unreachable!()
    };
    assert_eq!(view.to_move, Player::White);
    assert!(!view.oracle_thinking);
    assert!(view.notice.is_some());
    assert_eq!(view.board.empty_count(), 224);

    // Local input is refused while the oracle owes a move.
    harness.send(Command::Play(Move::new(0, 0)));
    harness.send(Command::RetryOracle);
    let events = harness.wait_for(|e| oracle_move(e).is_some()).await;

    assert!(events
        .iter()
        .all(|e| !matches!(e, GameEvent::MoveMade { by_oracle: false, .. })));
    assert_eq!(oracle_move(events.last().unwrap()), Some(Move::new(3, 3)));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_oracle_timeout_counts_as_failure() {
    let oracle = Arc::new(ScriptedOracle::new(vec![Step::Hang]));
    let settings = fast_settings().with_max_retries(0).with_timeout_secs(1);
    let mut harness = Harness::start(GameMode::OracleAssisted, oracle, settings);

    harness.send(Command::Play(Move::new(7, 7)));
    let events = harness
        .wait_for(|e| matches!(e, GameEvent::OracleFailed { .. }))
        .await;

    let Some(GameEvent::OracleFailed { message, .. }) = events.last() else {
        unreachable!()
    };
    assert!(message.contains("1 seconds"), "unexpected message: {}", message);

    harness.shutdown().await;
}

#[tokio::test]
async fn test_local_game_reports_winner() {
    let oracle = Arc::new(FirstEmptyOracle::default());
    let mut harness = Harness::start(GameMode::LocalTwoPlayer, oracle, fast_settings());

    for col in 0..4 {
        harness.send(Command::Play(Move::new(4, col)));
        harness.send(Command::Play(Move::new(10, col)));
    }
    // Occupied cell is ignored and Black stays to move.
    harness.send(Command::Play(Move::new(4, 0)));
    harness.send(Command::Play(Move::new(4, 4)));

    let events = harness
        .wait_for(|e| matches!(e, GameEvent::GameOver { .. }))
        .await;

    assert!(matches!(
        events.last(),
        Some(GameEvent::GameOver {
            status: GameStatus::Won(Player::Black)
        })
    ));
    assert!(events
        .iter()
        .all(|e| !matches!(e, GameEvent::OracleThinking { .. })));

    harness.shutdown().await;
}

#[tokio::test]
async fn test_mode_switch_mid_game() {
    let oracle = Arc::new(ScriptedOracle::new(vec![Step::Reply(0, 0)]));
    let mut harness = Harness::start(GameMode::LocalTwoPlayer, oracle.clone(), fast_settings());

    harness.send(Command::Play(Move::new(7, 7)));
    harness.send(Command::Reset(Some(GameMode::OracleAssisted)));
    harness
        .wait_for(|e| {
            matches!(
                e,
                GameEvent::GameReset {
                    mode: GameMode::OracleAssisted
                }
            )
        })
        .await;
    let events = harness
        .wait_for(|e| matches!(e, GameEvent::StateChanged(v) if v.mode == GameMode::OracleAssisted))
        .await;
    let Some(GameEvent::StateChanged(view)) = events.last() else {
        unreachable!()
    };
    assert_eq!(view.board.empty_count(), 225);
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);

    harness.send(Command::Play(Move::new(7, 7)));
    let events = harness.wait_for(|e| oracle_move(e).is_some()).await;
    assert_eq!(oracle_move(events.last().unwrap()), Some(Move::new(0, 0)));

    harness.shutdown().await;
}

#[tokio::test]
async fn test_reset_on_empty_board_is_announced() {
    let oracle = Arc::new(FirstEmptyOracle::default());
    let mut harness = Harness::start(GameMode::OracleAssisted, oracle, fast_settings());

    harness.send(Command::Reset(Some(GameMode::LocalTwoPlayer)));
    let events = harness
        .wait_for(|e| matches!(e, GameEvent::GameReset { .. }))
        .await;
    assert!(matches!(
        events.last(),
        Some(GameEvent::GameReset {
            mode: GameMode::LocalTwoPlayer
        })
    ));

    harness.send(Command::Reset(None));
    let events = harness
        .wait_for(|e| matches!(e, GameEvent::GameReset { .. }))
        .await;
    assert!(matches!(
        events.last(),
        Some(GameEvent::GameReset {
            mode: GameMode::LocalTwoPlayer
        })
    ));

    harness.shutdown().await;
}
