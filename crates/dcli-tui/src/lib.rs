//! Terminal dashboard for dcli
//!
//! Built with Ratatui. The screen state machine lives in `router`, the
//! application state and main loop in `app`, drawing in `ui`.

pub mod app;
mod event;
pub mod markdown;
pub mod router;
pub mod shell;
pub mod ui;
pub mod widgets;

pub use app::{App, AppError, AppResult};
pub use event::{Event, EventHandler};
pub use router::{route, Intent, Screen};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dcli_config::GlobalConfig;
use dcli_engine::ContainerEngine;
use ratatui::prelude::*;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static OWNS_TERMINAL: AtomicBool = AtomicBool::new(false);

/// Whether the dashboard is drawing on the terminal.
///
/// Log writers targeting stderr check this and discard records while it is
/// set; background tasks log from any thread, so a thread-local subscriber
/// override is not enough.
pub fn owns_terminal() -> bool {
    OWNS_TERMINAL.load(Ordering::SeqCst)
}

/// Run the dashboard until the user quits
pub async fn run(engine: Arc<dyn ContainerEngine>, config: &GlobalConfig) -> AppResult<()> {
    let mut app = App::new(engine, config).await?;

    // Setup terminal
    OWNS_TERMINAL.store(true, Ordering::SeqCst);
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    OWNS_TERMINAL.store(false, Ordering::SeqCst);

    res
}

/// Give the terminal back to the shell for a child process
pub(crate) fn suspend_terminal() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    disable_raw_mode()
}

/// Take the terminal back after `suspend_terminal`
pub(crate) fn resume_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
}
