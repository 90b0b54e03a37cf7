//! freshoffthebuild — what's most recently built, straight from Buildhub.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//! │  poll.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (thread) │  (channel) │ (state)  │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘
//!      ▲                       ▲
//!      │ PollCommand           │ handle_key_event()
//!      │                  ┌──────────┐
//!      └───────────────── │ input.rs │
//!           Command       └──────────┘
//! ```
//!
//! * **`source/`** — the `DataSource` trait, the Buildhub search source and
//!   the `Snapshot` of per-product build counts.
//! * **`poll`** — spawns a background thread that fetches on a timer and
//!   persists every successful lookup.
//! * **`history`** — initial / previous / current snapshots and the
//!   comparison rows derived from them.
//! * **`app`** — owns all state of one session.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** / **`form`** — key handling and the options form.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod countdown;
mod error;
mod form;
mod format;
mod history;
mod input;
mod logging;
mod poll;
mod source;
mod storage;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use app::App;
use config::{Cli, Config};
use input::Command;
use poll::Poller;
use source::BuildhubSource;
use storage::LastVisitStore;

// ---------------------------------------------------------------------------
// RAII terminal guard — restores the terminal even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints the panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One configuration's worth of dashboard: its state and its poller.
///
/// Dropping a session cancels its poll loop.
struct Session {
    app: App,
    poller: Poller,
}

impl Session {
    fn start(config: Config, store: &LastVisitStore) -> Result<Self> {
        let last_visit = store.load().unwrap_or_else(|e| {
            warn!(event = "session.last_visit_unreadable", error = %e);
            None
        });

        info!(
            event = "session.started",
            source = %config.source,
            frequency = config.frequency,
            unit = %config.unit,
            has_last_visit = last_visit.is_some()
        );

        let source = BuildhubSource::new(config.search_url());
        let poller = poll::spawn(source, config.interval(), Some(store.clone()))?;
        let app = App::new(config, last_visit.as_ref());
        Ok(Self { app, poller })
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_dir.clone())?;

    // A bad source URL stops here, before any terminal or poller exists.
    let config = Config::from_cli(&cli).inspect_err(|e| {
        tracing::error!(event = "startup.invalid_config", error = %e);
    })?;
    let store = LastVisitStore::new(
        cli.state_file
            .clone()
            .unwrap_or_else(LastVisitStore::default_path),
    );

    install_panic_hook();
    let mut session = Session::start(config, &store)?;
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the poller.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        // 1. Process poll messages
        while let Some(msg) = session.poller.try_recv() {
            session.app.apply(msg);
        }

        // 2. Render
        guard.terminal.draw(|f| ui::draw(&session.app, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match input::handle_key_event(&mut session.app, key) {
                    Some(Command::Refresh) => session.poller.refresh(),
                    Some(Command::Reload(config)) => {
                        // The old session is dropped, which cancels its poller.
                        session = Session::start(config, &store)?;
                    }
                    None => {}
                }
            }
        }

        if session.app.quit {
            break;
        }
    }

    session.poller.shutdown();
    info!(event = "session.closed", lookups = session.app.lookups);
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
