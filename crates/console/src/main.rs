mod cli;
mod config;
mod headless;
mod logging;
mod preferences;
mod ui;

use crate::cli::{Args, Command};
use crate::config::resolve_config;
use crate::logging::init_tracing;
use crate::preferences::Preferences;
use crate::ui::{draw_ui, handle_key_event, restore_terminal, setup_terminal, AppState};
use analysis_core::{AnalysisBackend, HttpBackend, Session, SessionEvent};
use clap::Parser;
use crossterm::event::{self, Event};
use protocol::config::ClientConfig;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let _file_guard = init_tracing(&args.log_dir, args.log_to_stderr)?;

    let config = resolve_config(&args)?;

    match &args.command {
        Some(Command::Health) => headless::run_health(&config).await,
        Some(Command::Analyze(analyze)) => headless::run_analyze(&config, analyze).await,
        None => {
            run_tui(config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_tui(config: ClientConfig) -> anyhow::Result<()> {
    let backend: Arc<dyn AnalysisBackend> = Arc::new(HttpBackend::new(&config)?);
    let (event_tx, mut event_rx) = mpsc::channel::<SessionEvent>(16);
    let mut session = Session::new(backend, event_tx);
    session.start_probe();

    let preferences = Preferences::init(Preferences::default_path());
    let mut app = AppState::new(session, config.skin, preferences, config.report_dir);
    tracing::info!(skin = %app.skin, theme = app.theme_mode().label(), "tui starting");

    let mut terminal = setup_terminal()?;

    let tick_rate = Duration::from_millis(100);
    let outcome = loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        if let Err(err) = terminal.draw(|frame| draw_ui(frame, &app)) {
            break Err(err.into());
        }

        match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if handle_key_event(key, &mut app) {
                        break Ok(());
                    }
                }
                Ok(_) => {}
                Err(err) => break Err(err.into()),
            },
            Ok(false) => {}
            Err(err) => break Err(err.into()),
        }
    };

    restore_terminal(&mut terminal)?;
    if let Err(err) = app.preferences.teardown() {
        tracing::warn!(error = %format!("{err:#}"), "failed to save preferences");
    }
    tracing::info!("tui stopped");
    outcome
}
