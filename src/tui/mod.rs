//! Terminal UI for omok

mod app;
mod input;
mod ui;

use crate::config::OmokConfig;
use crate::games::omok::Game;
use crate::oracle::MoveOracle;
use crate::orchestrator::{Command, GameEvent, Orchestrator};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use app::App;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Runs a game in the terminal until the user quits.
pub async fn run_tui(config: OmokConfig, oracle: Arc<dyn MoveOracle>) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create("omok.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(oracle = %oracle.name(), "Starting omok TUI");

    let rules = config.rules();
    let mode = *config.game().mode();
    let mut app = App::new(rules, mode, oracle.name());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let orchestrator = Orchestrator::new(
        Game::new(rules, mode),
        oracle,
        config.oracle().clone(),
        event_tx,
    );
    let (command_tx, handle) = orchestrator.spawn();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &command_tx, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Driver may already be gone if the loop failed on a closed channel.
    let _ = command_tx.send(Command::Shutdown);
    drop(event_rx);
    match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "Orchestrator stopped with error"),
        Err(e) => error!(error = %e, "Orchestrator task panicked"),
    }

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Draws, applies driver events and forwards key presses as commands.
#[instrument(skip_all)]
async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    commands: &mpsc::UnboundedSender<Command>,
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()> {
    loop {
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            tokio::task::yield_now().await;
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let command = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("User quit");
                return Ok(());
            }
            KeyCode::Char('r') => Some(Command::Reset(None)),
            KeyCode::Char('m') => Some(Command::Reset(Some(app.mode().toggled()))),
            KeyCode::Char('t') => Some(Command::RetryOracle),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Play(app.cursor())),
            code => {
                app.move_cursor(code);
                None
            }
        };

        if let Some(command) = command {
            debug!(?command, "Sending command");
            commands.send(command)?;
        }
    }
}
