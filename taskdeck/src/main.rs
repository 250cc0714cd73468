//! `TaskDeck`, a terminal to-do client with optimistic remote sync.
//!
//! Launches the TUI and connects to a task API server. Edits are applied
//! optimistically: when the server is unreachable they land in the local
//! list immediately and the UI says so. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskdeck/config.toml`).
//!
//! ```bash
//! # Default server (http://127.0.0.1:8700)
//! cargo run --bin taskdeck
//!
//! # Point at a different API
//! cargo run --bin taskdeck -- --api-url http://tasks.example.com
//!
//! # Or via environment variable
//! TASKDECK_API_URL=http://tasks.example.com cargo run --bin taskdeck
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use parking_lot::RwLock;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskdeck::app::App;
use taskdeck::config::{CliArgs, ClientConfig};
use taskdeck::monitor::DueMonitor;
use taskdeck::store::TaskStore;
use taskdeck::sync::{self, SyncCommand, SyncEvent, spawn_sync};
use taskdeck::ui;
use taskdeck::ui::theme::{self, Theme};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("taskdeck starting");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("taskdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> io::Result<()> {
    let default_theme = if config.dark_theme {
        Theme::Dark
    } else {
        Theme::Light
    };
    let mut app = App::new(
        theme::load_preference().unwrap_or(default_theme),
        config.timestamp_format.clone(),
    )
    .with_max_title_length(config.max_title_length);

    let store = Arc::new(RwLock::new(TaskStore::new()));
    let (evt_tx, mut evt_rx) = mpsc::channel(sync::DEFAULT_CHANNEL_CAPACITY);

    // A spawn failure here is a configuration problem (bad URL), not an
    // unreachable server; transient network errors are handled inside the
    // coordinator.
    let cmd_tx = match spawn_sync(&config.to_api_config(), Arc::clone(&store), evt_tx.clone()) {
        Ok(tx) => tx,
        Err(e) => {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    // Kick off the initial fetch; the result arrives as a snapshot event.
    let _ = cmd_tx.try_send(SyncCommand::LoadInitial);

    let monitor = DueMonitor::spawn(
        Arc::clone(&store),
        evt_tx.clone(),
        config.to_monitor_config(),
    );

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending sync events (non-blocking).
        drain_sync_events(&mut app, &mut evt_rx);

        // Step 3: Expire stale toasts.
        app.tick();

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(SyncCommand) when the key
            // triggered a mutation that the coordinator must process.
            if let Some(command) = app.handle_key_event(key) {
                match cmd_tx.try_send(command) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        app.push_notice(taskdeck::notify::Notification::error(
                            "Too many pending changes, try again",
                        ));
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        app.push_notice(taskdeck::notify::Notification::error(
                            "Sync worker stopped",
                        ));
                    }
                }
            }
        }

        if app.should_quit {
            monitor.stop();
            let _ = cmd_tx.try_send(SyncCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Drain all pending sync events from the receiver and apply them to the app.
fn drain_sync_events(app: &mut App, rx: &mut mpsc::Receiver<SyncEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            SyncEvent::Snapshot { tasks } => app.apply_snapshot(tasks),
            SyncEvent::Notice(notification) => app.push_notice(notification),
        }
    }
}
