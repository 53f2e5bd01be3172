//! Application state for the control panel.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::SessionSettings;
use crate::host::{Field, HostBindings};
use crate::session::{Phase, SessionController, SessionEvent};
use crate::update::{open_download, UpdateOffer};

/// Longest value accepted in a text input.
const MAX_DRAFT_LEN: usize = 4;

/// Application state.
pub struct App {
    /// The session state machine.
    pub controller: SessionController,
    /// Focus and break inputs.
    pub bindings: HostBindings,
    /// Input that arrow keys and digits go to.
    pub selected: Field,
    /// Digits typed into the selected input but not yet applied.
    pub draft: Option<String>,
    /// Status message to display.
    pub status: Option<String>,
    /// Update offer waiting for an answer.
    pub pending_offer: Option<UpdateOffer>,
    /// Whether the app should quit.
    pub should_quit: bool,
    updates: Option<Receiver<UpdateOffer>>,
}

impl App {
    /// Create a new app instance.
    ///
    /// The controller is built first and the inputs are then bound to it, so
    /// the inputs never publish into a controller that does not exist yet.
    #[must_use]
    pub fn new(
        settings: &SessionSettings,
        updates: Option<Receiver<UpdateOffer>>,
        display_width: u16,
    ) -> Self {
        let mut controller = SessionController::new(settings.session_config(), display_width);
        let bindings = HostBindings::new(settings);
        bindings.apply(&mut controller);

        Self {
            controller,
            bindings,
            selected: Field::FocusMinutes,
            draft: None,
            status: Some("Press s to start, ? for help".to_string()),
            pending_offer: None,
            should_quit: false,
            updates,
        }
    }

    /// Start a fresh session with the current inputs.
    pub fn start(&mut self, now: Instant) {
        if self.draft.is_some() {
            self.commit_draft();
        }
        if self.controller.start(now) {
            self.status = Some(format!(
                "Session started: {} focus, {} break",
                self.bindings.focus_minutes.label("min"),
                self.bindings.break_seconds.label("s")
            ));
        } else {
            self.status = Some(format!("Cannot start during {}", self.controller.phase()));
        }
    }

    /// Pause a running session, or resume a paused one.
    pub fn pause_or_resume(&mut self, now: Instant) {
        match self.controller.phase() {
            Phase::Running => {
                self.controller.pause();
                self.status = Some("Paused. p to resume, s to restart".to_string());
            }
            Phase::Paused => {
                self.controller.resume(now);
                self.status = Some("Resumed".to_string());
            }
            Phase::Idle | Phase::Break => {
                self.status = Some("Nothing to pause".to_string());
            }
        }
    }

    /// Stop everything and return to idle.
    pub fn stop(&mut self) {
        if self.controller.stop() {
            self.status = Some("Stopped".to_string());
        }
    }

    /// Move input focus to the other field.
    pub fn select_other_field(&mut self) {
        self.draft = None;
        self.selected = self.selected.toggle();
    }

    /// Nudge the selected input by one slider step.
    pub fn adjust(&mut self, up: bool) {
        if !self.inputs_unlocked() {
            return;
        }
        self.draft = None;
        let setting = self.bindings.setting_mut(self.selected);
        let changed = if up {
            setting.step_up()
        } else {
            setting.step_down()
        };
        if changed {
            self.bindings.apply(&mut self.controller);
        }
    }

    /// Append a digit to the selected input's draft.
    pub fn type_digit(&mut self, digit: char) {
        if !self.inputs_unlocked() || !digit.is_ascii_digit() {
            return;
        }
        let draft = self.draft.get_or_insert_with(String::new);
        if draft.len() < MAX_DRAFT_LEN {
            draft.push(digit);
        }
    }

    /// Remove the last typed digit.
    pub fn backspace(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.pop();
            if draft.is_empty() {
                self.draft = None;
            }
        }
    }

    /// Apply the draft to the selected input.
    ///
    /// The value is clamped into range; text that does not parse is dropped.
    pub fn commit_draft(&mut self) {
        let Some(draft) = self.draft.take() else {
            return;
        };
        if !self.inputs_unlocked() {
            return;
        }
        let setting = self.bindings.setting_mut(self.selected);
        if setting.publish_text(&draft) {
            self.bindings.apply(&mut self.controller);
        }
        debug!(field = ?self.selected, %draft, "input committed");
    }

    /// Throw the draft away.
    pub fn discard_draft(&mut self) {
        self.draft = None;
    }

    /// Open the pending offer's download page.
    pub fn accept_update(&mut self) {
        let Some(offer) = self.pending_offer.take() else {
            return;
        };
        match open_download(&offer) {
            Ok(()) => {
                info!(url = %offer.download_url, "opened download page");
                self.status = Some(format!("Opened {}", offer.download_url));
            }
            Err(e) => {
                warn!(error = %e, "could not open download page");
                self.status = Some(format!("Could not open browser: {e}"));
            }
        }
    }

    /// Decline the pending offer.
    pub fn dismiss_update(&mut self) {
        if self.pending_offer.take().is_some() {
            self.status = None;
        }
    }

    /// Drive timers and pick up a finished update check.
    pub fn pump(&mut self, now: Instant) {
        self.poll_updates();

        for event in self.controller.pump(now) {
            match event {
                SessionEvent::BreakStarted { break_seconds } => {
                    self.status = Some(format!("Break time: {break_seconds}s"));
                }
                SessionEvent::BreakEnded => {
                    self.status = Some("Break over. Press s for the next session".to_string());
                }
                SessionEvent::Tick { .. } | SessionEvent::Overlay { .. } => {}
            }
        }
    }

    /// Track the terminal width the widget is centered on.
    pub fn on_resize(&mut self, width: u16) {
        self.controller.set_display_width(width);
    }

    /// Tear down every surface and timer.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    /// The draft if the field is being typed into, otherwise the stored value.
    #[must_use]
    pub fn field_text(&self, field: Field) -> String {
        match &self.draft {
            Some(draft) if field == self.selected => draft.clone(),
            _ => self.bindings.setting(field).text(),
        }
    }

    fn inputs_unlocked(&mut self) -> bool {
        if self.controller.inputs_enabled() {
            true
        } else {
            self.status = Some("Settings are locked while a session runs".to_string());
            false
        }
    }

    fn poll_updates(&mut self) {
        let Some(rx) = &self.updates else {
            return;
        };
        match rx.try_recv() {
            Ok(offer) => {
                info!(latest = %offer.latest, "update available");
                self.status = Some(format!(
                    "ikiflow {} is available. y to download, n to dismiss",
                    offer.latest
                ));
                self.pending_offer = Some(offer);
                self.updates = None;
            }
            Err(TryRecvError::Disconnected) => self.updates = None,
            Err(TryRecvError::Empty) => {}
        }
    }
}
