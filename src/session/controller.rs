//! Session state machine.
//!
//! The controller owns the focus countdown, the session tick source, and
//! whichever surface belongs to the current phase: the floating widget while
//! running or paused, the break overlay during a break, nothing while idle.
//!
//! ```text
//!   Idle ──start──▶ Running ──pause──▶ Paused
//!    ▲               │  ▲                │ │
//!    │               │  └────resume──────┘ │
//!    │               │  ◀────start─────────┘ (re-armed from config)
//!    │         remaining hits 0
//!    │               ▼
//!    └─overlay closed── Break
//! ```
//!
//! `stop` returns to `Idle` from any phase. Start while running or during a
//! break is ignored.

use std::time::Instant;

use chrono::Duration;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::presenter::overlay::{BreakOverlay, OverlayEvent};
use crate::presenter::widget::{FloatingWidget, PAUSED_LABEL};
use crate::session::config::SessionConfig;
use crate::session::timer::{format_duration_mmss, Countdown, Ticker};

/// The session's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Waiting for Start.
    Idle,
    /// Counting down the focus interval.
    Running,
    /// Focus countdown suspended; `remaining` preserved.
    Paused,
    /// Break overlay showing.
    Break,
}

impl Phase {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Break => "Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Snapshot of the session state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: Phase,
    pub remaining_seconds: i64,
    /// Remaining time over the focus duration, in `[0, 1]`.
    pub progress_fraction: f64,
}

/// Observable outcome of a tick or timer poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A focus tick; the widget was updated.
    Tick { remaining_seconds: i64, bars_lit: usize },
    /// The focus interval ran out and the overlay was shown.
    BreakStarted { break_seconds: u32 },
    /// Something happened on the overlay.
    Overlay { overlay: OverlayEvent },
    /// The overlay closed and the session is idle again.
    BreakEnded,
}

/// The session controller.
#[derive(Debug)]
pub struct SessionController {
    /// Latest configuration from the host.
    config: SessionConfig,
    /// Snapshot taken at the last Start.
    active: SessionConfig,
    phase: Phase,
    countdown: Countdown,
    ticker: Ticker,
    widget: Option<FloatingWidget>,
    overlay: Option<BreakOverlay>,
    display_width: u16,
}

impl SessionController {
    /// Create an idle controller.
    #[must_use]
    pub fn new(config: SessionConfig, display_width: u16) -> Self {
        Self {
            config,
            active: config,
            phase: Phase::Idle,
            countdown: Countdown::new(config.focus_duration()),
            ticker: Ticker::every_second(),
            widget: None,
            overlay: None,
            display_width,
        }
    }

    /// Replace the configuration.
    ///
    /// Never touches an in-progress countdown or a showing overlay; the new
    /// values apply from the next Start. While idle the displayed remaining
    /// time follows the new focus duration.
    pub fn configure(&mut self, config: SessionConfig) {
        self.config = config;
        if self.phase == Phase::Idle {
            self.countdown = Countdown::new(config.focus_duration());
        }
        debug!(
            focus_seconds = config.focus_duration().num_seconds(),
            break_seconds = config.break_seconds(),
            phase = %self.phase,
            "configuration updated"
        );
    }

    /// Width of the display new widgets are centered on.
    pub fn set_display_width(&mut self, width: u16) {
        self.display_width = width;
    }

    /// Start a fresh focus interval from the latest configuration.
    ///
    /// Valid from `Idle` and `Paused`; from `Paused` the previous remaining
    /// time is discarded. Returns false when ignored.
    pub fn start(&mut self, now: Instant) -> bool {
        if matches!(self.phase, Phase::Running | Phase::Break) {
            warn!(phase = %self.phase, "start ignored");
            return false;
        }

        self.active = self.config;
        self.countdown = Countdown::new(self.active.focus_duration());
        self.ticker.start(now);
        self.phase = Phase::Running;

        let display_width = self.display_width;
        self.widget
            .get_or_insert_with(|| FloatingWidget::create(display_width));
        self.push_widget_update();

        debug!(remaining = %self.remaining_label(), "session started");
        true
    }

    /// Suspend the countdown, keeping the remaining time.
    ///
    /// Returns false (and changes nothing) unless running.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            trace!(phase = %self.phase, "pause ignored");
            return false;
        }

        self.ticker.stop();
        self.phase = Phase::Paused;
        if let Some(widget) = self.widget.as_mut() {
            widget.update_time(PAUSED_LABEL);
        }

        debug!(remaining = %self.remaining_label(), "session paused");
        true
    }

    /// Continue a paused countdown from where it stopped.
    ///
    /// Returns false unless paused.
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Paused {
            trace!(phase = %self.phase, "resume ignored");
            return false;
        }

        self.ticker.start(now);
        self.phase = Phase::Running;
        self.push_widget_update();

        debug!(remaining = %self.remaining_label(), "session resumed");
        true
    }

    /// Abandon the cycle and return to idle from any phase.
    ///
    /// Closes the widget and closes any overlay without fading. Returns false
    /// if already idle.
    pub fn stop(&mut self) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }

        self.ticker.stop();
        if let Some(widget) = self.widget.take() {
            widget.close();
        }
        if let Some(mut overlay) = self.overlay.take() {
            overlay.force_close();
        }
        self.phase = Phase::Idle;
        self.countdown = Countdown::new(self.config.focus_duration());

        debug!("session stopped");
        true
    }

    /// Tear everything down before the host exits.
    ///
    /// After this no timer is left armed and no surface is open.
    pub fn shutdown(&mut self) {
        let was = self.phase;
        self.stop();
        debug!(phase = %was, "controller shut down");
    }

    /// Deliver one session tick.
    ///
    /// Only meaningful while running; returns `None` otherwise. Decrements the
    /// remaining time by one second and either refreshes the widget or, once
    /// the countdown is exhausted, hands over to the break overlay.
    pub fn tick(&mut self, now: Instant) -> Option<SessionEvent> {
        if self.phase != Phase::Running {
            trace!(phase = %self.phase, "tick ignored");
            return None;
        }

        if self.countdown.tick() {
            return Some(self.begin_break(now));
        }

        self.push_widget_update();
        trace!(remaining = self.countdown.remaining_seconds(), "session tick");
        Some(SessionEvent::Tick {
            remaining_seconds: self.countdown.remaining_seconds(),
            bars_lit: self
                .widget
                .as_ref()
                .map_or(0, |widget| widget.view_model().bars_lit),
        })
    }

    fn begin_break(&mut self, now: Instant) -> SessionEvent {
        self.ticker.stop();
        if let Some(widget) = self.widget.take() {
            widget.close();
        }

        let break_seconds = self.active.break_seconds();
        self.overlay = Some(BreakOverlay::create(break_seconds, now));
        self.phase = Phase::Break;

        debug!(break_seconds, "focus interval finished, break started");
        SessionEvent::BreakStarted { break_seconds }
    }

    /// Drive the session tick source and the overlay's timers up to `now`.
    ///
    /// Events are returned in the order they happened. When the overlay
    /// reports that it closed, the controller moves from `Break` to `Idle`.
    pub fn pump(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        match self.phase {
            Phase::Running => {
                for _ in 0..self.ticker.poll(now) {
                    match self.tick(now) {
                        Some(event @ SessionEvent::BreakStarted { .. }) => {
                            events.push(event);
                            break;
                        }
                        Some(event) => events.push(event),
                        None => break,
                    }
                }
            }
            Phase::Break => {
                let closed = match self.overlay.as_mut() {
                    Some(overlay) => {
                        events.extend(
                            overlay
                                .poll(now)
                                .into_iter()
                                .map(|overlay| SessionEvent::Overlay { overlay }),
                        );
                        overlay.is_closed()
                    }
                    None => true,
                };
                if closed {
                    self.finish_break();
                    events.push(SessionEvent::BreakEnded);
                }
            }
            Phase::Idle | Phase::Paused => {}
        }

        events
    }

    fn finish_break(&mut self) {
        self.overlay = None;
        self.phase = Phase::Idle;
        self.countdown = Countdown::new(self.config.focus_duration());
        debug!("break finished, ready for the next session");
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Remaining focus time.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        self.countdown.remaining()
    }

    /// State snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        SessionState {
            phase: self.phase,
            remaining_seconds: self.countdown.remaining_seconds(),
            progress_fraction: self.countdown.remaining_fraction(),
        }
    }

    /// Remaining focus time as `mm:ss`.
    #[must_use]
    pub fn remaining_label(&self) -> String {
        format_duration_mmss(self.remaining())
    }

    /// Status line for the control panel.
    #[must_use]
    pub fn status_label(&self) -> String {
        format!("Status: {}", self.phase)
    }

    /// Countdown line for the control panel.
    #[must_use]
    pub fn countdown_label(&self) -> String {
        match self.phase {
            Phase::Running | Phase::Paused => format!("Next: {}", self.remaining_label()),
            Phase::Idle | Phase::Break => "Next: --".to_string(),
        }
    }

    /// Whether configuration inputs may be edited.
    #[must_use]
    pub fn inputs_enabled(&self) -> bool {
        self.phase != Phase::Running
    }

    /// Whether the widget or the overlay is currently shown.
    #[must_use]
    pub const fn surface_visible(&self) -> bool {
        self.widget.is_some() || self.overlay.is_some()
    }

    /// The floating widget, if shown.
    #[must_use]
    pub const fn widget(&self) -> Option<&FloatingWidget> {
        self.widget.as_ref()
    }

    /// The break overlay, if shown.
    #[must_use]
    pub const fn overlay(&self) -> Option<&BreakOverlay> {
        self.overlay.as_ref()
    }

    /// Latest configuration.
    #[must_use]
    pub const fn config(&self) -> SessionConfig {
        self.config
    }

    fn push_widget_update(&mut self) {
        let label = self.countdown.format_remaining();
        let fraction = self.countdown.remaining_fraction();
        if let Some(widget) = self.widget.as_mut() {
            widget.update_time(label);
            widget.update_progress(fraction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::widget::TOTAL_BARS;
    use crate::session::timer::TICK;
    use proptest::prelude::*;

    fn controller(focus_seconds: i64, break_seconds: u32) -> SessionController {
        SessionController::new(
            SessionConfig::with_durations(Duration::seconds(focus_seconds), break_seconds),
            120,
        )
    }

    fn assert_surfaces(c: &SessionController) {
        match c.phase() {
            Phase::Idle => {
                assert!(c.widget().is_none());
                assert!(c.overlay().is_none());
            }
            Phase::Running | Phase::Paused => {
                assert!(c.widget().is_some());
                assert!(c.overlay().is_none());
            }
            Phase::Break => {
                assert!(c.widget().is_none());
                assert!(c.overlay().is_some());
            }
        }
    }

    #[test]
    fn test_new_is_idle() {
        let c = SessionController::new(SessionConfig::default(), 80);
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.remaining(), Duration::minutes(30));
        assert!(!c.surface_visible());
        assert!(c.inputs_enabled());
        assert_eq!(c.status_label(), "Status: Ready");
        assert_eq!(c.countdown_label(), "Next: --");
    }

    #[test]
    fn test_start_arms_everything() {
        let mut c = controller(120, 30);
        assert!(c.start(Instant::now()));

        assert_eq!(c.phase(), Phase::Running);
        assert!(!c.inputs_enabled());
        assert_eq!(c.remaining_label(), "02:00");
        let vm = c.widget().map(FloatingWidget::view_model);
        assert_eq!(vm.as_ref().map(|vm| vm.bars_lit), Some(TOTAL_BARS));
        assert_eq!(vm.map(|vm| vm.remaining_label), Some("02:00".to_string()));
        assert_surfaces(&c);
    }

    #[test]
    fn test_start_while_running_ignored() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        c.start(now);
        c.tick(now);
        assert!(!c.start(now));
        assert_eq!(c.remaining().num_seconds(), 119);
    }

    #[test]
    fn test_tick_not_running_is_noop() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        assert_eq!(c.tick(now), None);
        assert_eq!(c.remaining().num_seconds(), 120);

        c.start(now);
        c.pause();
        assert_eq!(c.tick(now), None);
        assert_eq!(c.remaining().num_seconds(), 120);
    }

    #[test]
    fn test_tick_updates_widget() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        c.start(now);
        for _ in 0..65 {
            c.tick(now);
        }
        let vm = c.widget().map(FloatingWidget::view_model);
        assert_eq!(
            vm.as_ref().map(|vm| vm.remaining_label.as_str()),
            Some("00:55")
        );
        // 55/120 * 12 = 5.5, rounded up
        assert_eq!(vm.map(|vm| vm.bars_lit), Some(6));
        assert_eq!(c.countdown_label(), "Next: 00:55");
    }

    #[test]
    fn test_pause_keeps_remaining_and_bars() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        c.start(now);
        for _ in 0..65 {
            c.tick(now);
        }

        assert!(c.pause());
        assert_eq!(c.phase(), Phase::Paused);
        assert!(c.pump(now + TICK * 10).is_empty());
        assert!(c.inputs_enabled());
        let vm = c.widget().map(FloatingWidget::view_model);
        assert_eq!(
            vm.as_ref().map(|vm| vm.remaining_label.as_str()),
            Some(PAUSED_LABEL)
        );
        assert_eq!(vm.map(|vm| vm.bars_lit), Some(6));
        assert_surfaces(&c);
    }

    #[test]
    fn test_pause_twice_is_idempotent() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        c.start(now);
        c.tick(now);
        c.tick(now);

        assert!(c.pause());
        let after_first = c.remaining();
        assert!(!c.pause());
        assert_eq!(c.remaining(), after_first);
        assert_eq!(c.phase(), Phase::Paused);
    }

    #[test]
    fn test_start_after_pause_rearms() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        c.start(now);
        for _ in 0..10 {
            c.tick(now);
        }
        c.pause();
        assert!(c.start(now));
        assert_eq!(c.remaining().num_seconds(), 120);
        assert_eq!(c.phase(), Phase::Running);
    }

    #[test]
    fn test_resume_preserves_remaining() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        c.start(now);
        for _ in 0..10 {
            c.tick(now);
        }
        c.pause();
        assert!(c.resume(now));
        assert_eq!(c.remaining().num_seconds(), 110);
        assert_eq!(c.phase(), Phase::Running);
        assert_eq!(
            c.widget().map(|w| w.view_model().remaining_label),
            Some("01:50".to_string())
        );

        // The tick source is running again
        assert_eq!(c.pump(now + TICK).len(), 1);
        assert_eq!(c.remaining().num_seconds(), 109);
    }

    #[test]
    fn test_resume_only_from_paused() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        assert!(!c.resume(now));
        c.start(now);
        assert!(!c.resume(now));
    }

    #[test]
    fn test_exhaustion_hands_over_to_overlay() {
        let now = Instant::now();
        let mut c = controller(2, 3);
        c.start(now);

        assert!(matches!(
            c.tick(now),
            Some(SessionEvent::Tick {
                remaining_seconds: 1,
                ..
            })
        ));
        assert_eq!(
            c.tick(now),
            Some(SessionEvent::BreakStarted { break_seconds: 3 })
        );

        assert_eq!(c.phase(), Phase::Break);
        assert_eq!(c.remaining().num_seconds(), 0);
        assert!(!c
            .pump(now)
            .iter()
            .any(|e| matches!(e, SessionEvent::Tick { .. })));
        assert!(c.inputs_enabled());
        assert_eq!(c.overlay().map(BreakOverlay::max_seconds), Some(3));
        assert_surfaces(&c);

        // Further ticks do nothing during the break
        assert_eq!(c.tick(now), None);
    }

    #[test]
    fn test_config_change_does_not_touch_running_session() {
        let now = Instant::now();
        let mut c = controller(2, 30);
        c.start(now);
        c.tick(now);

        c.configure(SessionConfig::from_inputs(50, 200));
        assert_eq!(c.remaining().num_seconds(), 1);

        // The break comes from the values the session started with
        assert_eq!(
            c.tick(now),
            Some(SessionEvent::BreakStarted { break_seconds: 30 })
        );

        // Next Start picks the new values up
        c.stop();
        c.start(now);
        assert_eq!(c.remaining(), Duration::minutes(50));
    }

    #[test]
    fn test_config_change_during_break_does_not_touch_overlay() {
        let now = Instant::now();
        let mut c = controller(1, 20);
        c.start(now);
        c.tick(now);
        assert_eq!(c.phase(), Phase::Break);

        c.configure(SessionConfig::from_inputs(10, 600));
        assert_eq!(c.overlay().map(BreakOverlay::max_seconds), Some(20));
    }

    #[test]
    fn test_configure_while_idle_updates_remaining() {
        let mut c = controller(120, 30);
        c.configure(SessionConfig::from_inputs(5, 30));
        assert_eq!(c.remaining(), Duration::minutes(5));
    }

    #[test]
    fn test_stop_from_break_closes_overlay() {
        let now = Instant::now();
        let mut c = controller(1, 20);
        c.start(now);
        c.tick(now);
        assert!(c.stop());
        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.surface_visible());
        assert!(!c.stop());
    }

    #[test]
    fn test_shutdown_leaves_nothing_armed() {
        let now = Instant::now();
        let mut c = controller(120, 30);
        c.start(now);
        c.shutdown();
        assert!(!c.surface_visible());
        assert!(c.pump(now + TICK * 500).is_empty());
    }

    #[test]
    fn test_pump_drives_full_cycle() {
        let start = Instant::now();
        let mut c = controller(2, 3);
        c.start(start);

        assert_eq!(
            c.pump(start + TICK),
            vec![SessionEvent::Tick {
                remaining_seconds: 1,
                bars_lit: 6
            }]
        );
        assert_eq!(
            c.pump(start + TICK * 2),
            vec![SessionEvent::BreakStarted { break_seconds: 3 }]
        );

        // The overlay's timers start from the moment the break began
        let break_start = start + TICK * 2;
        let progress: Vec<_> = (1..=3)
            .flat_map(|s| c.pump(break_start + TICK * s))
            .collect();
        assert_eq!(
            progress,
            vec![
                SessionEvent::Overlay {
                    overlay: OverlayEvent::Progress(2)
                },
                SessionEvent::Overlay {
                    overlay: OverlayEvent::Progress(1)
                },
                SessionEvent::Overlay {
                    overlay: OverlayEvent::Progress(0)
                },
                SessionEvent::Overlay {
                    overlay: OverlayEvent::FadeStarted
                },
            ]
        );
        assert_eq!(c.phase(), Phase::Break);

        assert_eq!(
            c.pump(break_start + TICK * 4),
            vec![
                SessionEvent::Overlay {
                    overlay: OverlayEvent::Closed
                },
                SessionEvent::BreakEnded
            ]
        );
        assert_eq!(c.phase(), Phase::Idle);
        assert!(!c.surface_visible());
        assert_eq!(c.remaining().num_seconds(), 2);

        // Ready for the next Start
        assert!(c.start(break_start + TICK * 5));
    }

    #[test]
    fn test_pump_catches_up_but_stops_at_break() {
        let start = Instant::now();
        let mut c = controller(3, 10);
        c.start(start);
        let events = c.pump(start + TICK * 10);
        assert_eq!(events.len(), 3);
        assert_eq!(
            events.last(),
            Some(&SessionEvent::BreakStarted { break_seconds: 10 })
        );
    }

    proptest! {
        #[test]
        fn prop_focus_ticks_reach_zero_once(focus in 1i64..2000) {
            let now = Instant::now();
            let mut c = controller(focus, 10);
            c.start(now);

            let mut breaks = 0;
            for _ in 0..focus {
                if let Some(SessionEvent::BreakStarted { .. }) = c.tick(now) {
                    breaks += 1;
                }
                prop_assert!(c.remaining().num_seconds() >= 0);
            }
            prop_assert_eq!(breaks, 1);
            prop_assert_eq!(c.remaining().num_seconds(), 0);
            prop_assert_eq!(c.phase(), Phase::Break);
        }

        #[test]
        fn prop_bars_never_increase_while_running(focus in 1i64..3000) {
            let now = Instant::now();
            let mut c = controller(focus, 10);
            c.start(now);
            let mut last = TOTAL_BARS;
            while let Some(SessionEvent::Tick { bars_lit, .. }) = c.tick(now) {
                prop_assert!(bars_lit <= last);
                last = bars_lit;
            }
        }

        #[test]
        fn prop_restart_after_pause_resets(focus in 2i64..500, n in 1i64..500) {
            let n = n.min(focus - 1);
            let now = Instant::now();

            let mut c = controller(focus, 10);
            c.start(now);
            for _ in 0..n {
                c.tick(now);
            }
            c.pause();
            prop_assert_eq!(c.remaining().num_seconds(), focus - n);
            c.start(now);
            prop_assert_eq!(c.remaining().num_seconds(), focus);

            let mut r = controller(focus, 10);
            r.start(now);
            for _ in 0..n {
                r.tick(now);
            }
            r.pause();
            r.resume(now);
            prop_assert_eq!(r.remaining().num_seconds(), focus - n);
        }
    }
}
