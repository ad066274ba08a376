//! Terminal UI for the character guesser.
//!
//! Renders the state machine's snapshot and turns key presses into
//! intents; all game logic lives in [`crate::machine`].

mod form;
mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tokio::time::{Duration, sleep};
use tracing::{error, info, instrument};

use crate::client::EngineClient;
use crate::config::ClientConfig;
use crate::machine::{GameMachine, Intent, Phase};
use form::FormState;
use input::UiCommand;

/// Runs the TUI client until the player quits.
pub async fn run_tui(config: &ClientConfig) -> Result<()> {
    // Log to a file so tracing output doesn't tear the alternate screen.
    let log_file = std::fs::File::create("twentyq_tui.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!(server_url = %config.server_url(), "Starting twentyq TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = EngineClient::new(config.server_url());
    let mut machine = GameMachine::new(client);

    let res = run_loop(&mut terminal, &mut machine).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

/// Drives the render / input / intent loop.
#[instrument(skip_all)]
async fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    machine: &mut GameMachine<EngineClient>,
) -> Result<()> {
    let mut form = FormState::default();

    loop {
        terminal.draw(|frame| ui::draw(frame, machine.snapshot(), &form))?;

        // Short poll keeps the loop responsive without spinning.
        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
        {
            // Skip key release events (crossterm fires both press and release).
            if key.kind == KeyEventKind::Release {
                continue;
            }

            let command = match machine.snapshot().phase() {
                Phase::Adding => form.handle_key(key),
                phase => input::map_key(*phase, key.code),
            };

            match command {
                Some(UiCommand::Quit) => {
                    info!("Player quit");
                    return Ok(());
                }
                Some(UiCommand::Intent(intent)) => {
                    let fresh_form = matches!(intent, Intent::ConfirmIncorrect);
                    machine.handle(intent).await;

                    // The form belongs to one add-character attempt.
                    if fresh_form || *machine.snapshot().phase() != Phase::Adding {
                        form = FormState::default();
                    }
                }
                None => {}
            }
        }

        sleep(Duration::from_millis(10)).await;
    }
}
