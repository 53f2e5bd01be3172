//! Event handling for the control panel.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::IkiflowError;
use crate::tui::app::App;

/// How long to wait for input before pumping timers again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Help line shown on '?'.
pub const HELP: &str =
    "s:start | p:pause/resume | x:stop | Tab:field | ←/→:adjust | 0-9 Enter:type | q:quit";

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
}

/// Handle terminal events.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App) -> Result<Option<Action>, IkiflowError> {
    if !event::poll(POLL_INTERVAL)
        .map_err(|e| IkiflowError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    match event::read().map_err(|e| IkiflowError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(handle_key(app, key, Instant::now()))
        }
        Event::Resize(width, _) => {
            app.on_resize(width);
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Apply one key press to the app.
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Option<Action> {
    // Handle Ctrl+C
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // An update prompt takes y/n before anything else
    if app.pending_offer.is_some() {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                app.accept_update();
                return None;
            }
            KeyCode::Char('n' | 'N') => {
                app.dismiss_update();
                return None;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('s') => app.start(now),
        KeyCode::Char('p' | ' ') => app.pause_or_resume(now),
        KeyCode::Char('x') => app.stop(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.select_other_field();
        }
        KeyCode::Right | KeyCode::Char('+' | 'l') => app.adjust(true),
        KeyCode::Left | KeyCode::Char('-' | 'h') => app.adjust(false),
        KeyCode::Char(c) if c.is_ascii_digit() => app.type_digit(c),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.commit_draft(),
        KeyCode::Esc => {
            if app.draft.is_some() {
                app.discard_draft();
            } else {
                app.status = None;
            }
        }
        KeyCode::Char('?') => app.status = Some(HELP.to_string()),
        _ => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionSettings;
    use crate::session::Phase;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(&SessionSettings::default(), None, 80)
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q')), now), Some(Action::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut app, ctrl_c, now), Some(Action::Quit));
    }

    #[test]
    fn test_session_keys() {
        let mut app = app();
        let now = Instant::now();
        handle_key(&mut app, key(KeyCode::Char('s')), now);
        assert_eq!(app.controller.phase(), Phase::Running);
        handle_key(&mut app, key(KeyCode::Char('p')), now);
        assert_eq!(app.controller.phase(), Phase::Paused);
        handle_key(&mut app, key(KeyCode::Char('x')), now);
        assert_eq!(app.controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_typing_a_value() {
        let mut app = app();
        let now = Instant::now();
        handle_key(&mut app, key(KeyCode::Char('4')), now);
        handle_key(&mut app, key(KeyCode::Char('5')), now);
        handle_key(&mut app, key(KeyCode::Enter), now);
        assert_eq!(app.bindings.focus_minutes.value(), 45);
    }

    #[test]
    fn test_arrows_adjust_selected_field() {
        let mut app = app();
        let now = Instant::now();
        handle_key(&mut app, key(KeyCode::Tab), now);
        handle_key(&mut app, key(KeyCode::Left), now);
        assert_eq!(app.bindings.break_seconds.value(), 290);
    }

    #[test]
    fn test_help() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Char('?')), Instant::now());
        assert_eq!(app.status.as_deref(), Some(HELP));
        handle_key(&mut app, key(KeyCode::Esc), Instant::now());
        assert!(app.status.is_none());
    }
}
