//! Terminal User Interface (TUI) for ikiflow.
//!
//! The control panel, the floating widget and the break overlay, drawn in one
//! terminal. Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::App;

use std::io;
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::debug;

use crate::config::SessionSettings;
use crate::error::IkiflowError;
use crate::update::spawn_check;

/// Width assumed when the terminal size cannot be read.
const FALLBACK_WIDTH: u16 = 80;

/// Run the control panel until the user quits.
///
/// When `update_url` is set, a background update check starts first.
///
/// # Errors
///
/// Returns an error if the terminal fails to initialize or draw.
pub fn run(settings: &SessionSettings, update_url: Option<String>) -> Result<(), IkiflowError> {
    let updates = update_url.map(spawn_check);
    let width = terminal::size().map_or(FALLBACK_WIDTH, |(w, _)| w);

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| IkiflowError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| IkiflowError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| IkiflowError::Terminal(format!("Failed to create terminal: {e}")))?;

    let mut app = App::new(settings, updates, width);
    let result = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), IkiflowError> {
    while !app.should_quit {
        let now = Instant::now();
        app.pump(now);

        terminal
            .draw(|frame| ui::render(frame, app, now))
            .map_err(|e| IkiflowError::Terminal(format!("Failed to draw: {e}")))?;

        if let Some(event::Action::Quit) = event::handle_events(app)? {
            debug!(phase = %app.controller.phase(), "quit requested");
            app.should_quit = true;
        }
    }

    Ok(())
}
