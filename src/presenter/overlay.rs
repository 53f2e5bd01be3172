//! Break overlay.
//!
//! Full-frame break screen with a countdown bar. The overlay is pass-through:
//! it never consumes keyboard input, so the control panel beneath it keeps
//! working while it is shown.
//!
//! Two timers are seeded with the same break length and run independently:
//!
//! - the progress timer ticks the visible countdown down to zero and then
//!   stops itself;
//! - the close timer fires once after the full break and starts a one-second
//!   fade from 0.85 to 0, after which the overlay is closed.
//!
//! An empty progress bar therefore does not close the overlay by itself; the
//! fade gives a short grace period after the countdown reaches zero.

use std::time::{Duration as StdDuration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

use crate::session::timer::{Fade, OneShot, Ticker, TICK};

/// Opacity while the overlay is fully shown, and where the fade starts.
pub const SHOWN_OPACITY: f32 = 0.85;

/// Length of the closing fade.
pub const FADE_DURATION: StdDuration = StdDuration::from_secs(1);

/// Seconds each break tip stays on screen.
pub const TIP_INTERVAL_SECONDS: u32 = 8;

const BREAK_TIPS: [&str; 6] = [
    "Release your jaw.",
    "Look at something 20 feet away.",
    "Take a deep belly breath.",
    "Stretch your shoulders.",
    "Drink a glass of water.",
    "Relax your forehead.",
];

/// Render state for one frame of the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayViewModel {
    /// Value of the countdown bar.
    pub seconds_remaining: u32,
    /// Maximum of the countdown bar (the break length).
    pub max_seconds: u32,
    /// Current opacity, `0.0..=0.85`.
    pub opacity: f32,
    /// Break tip currently shown.
    pub tip: &'static str,
}

/// Something that happened while driving the overlay's timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum OverlayEvent {
    /// The progress timer ticked; carries the new countdown value.
    Progress(u32),
    /// The close timer fired and the fade began.
    FadeStarted,
    /// The fade finished and the overlay closed.
    Closed,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Showing,
    Fading(Fade),
    Closed,
}

/// The break overlay.
#[derive(Debug, Clone)]
pub struct BreakOverlay {
    max_seconds: u32,
    seconds_remaining: u32,
    progress_ticks: u32,
    progress_timer: Ticker,
    close_timer: OneShot,
    stage: Stage,
}

impl BreakOverlay {
    /// Create and show an overlay for `break_seconds`, starting both timers at `now`.
    ///
    /// The length is fixed for the overlay's lifetime. Zero is raised to one
    /// second.
    #[must_use]
    pub fn create(break_seconds: u32, now: Instant) -> Self {
        let break_seconds = break_seconds.max(1);

        let mut progress_timer = Ticker::new(TICK);
        progress_timer.start(now);

        let mut close_timer = OneShot::new(TICK * break_seconds);
        close_timer.arm(now);

        debug!(break_seconds, "break overlay shown");

        Self {
            max_seconds: break_seconds,
            seconds_remaining: break_seconds,
            progress_ticks: 0,
            progress_timer,
            close_timer,
            stage: Stage::Showing,
        }
    }

    /// Deliver one progress tick.
    ///
    /// Returns the new countdown value, or `None` once the progress timer has
    /// stopped itself at zero.
    pub fn progress_tick(&mut self) -> Option<u32> {
        if !self.progress_timer.is_active() {
            return None;
        }

        self.progress_ticks += 1;
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.progress_timer.stop();
        }
        trace!(remaining = self.seconds_remaining, "overlay progress tick");
        Some(self.seconds_remaining)
    }

    fn begin_fade(&mut self, now: Instant) {
        debug!("break over, fading out");
        self.stage = Stage::Fading(Fade::new(SHOWN_OPACITY, 0.0, FADE_DURATION, now));
    }

    /// Drive all timers up to `now` and report what happened, in order.
    pub fn poll(&mut self, now: Instant) -> Vec<OverlayEvent> {
        let mut events = Vec::new();

        for _ in 0..self.progress_timer.poll(now) {
            match self.progress_tick() {
                Some(value) => events.push(OverlayEvent::Progress(value)),
                None => break,
            }
        }

        if self.close_timer.poll(now) {
            self.begin_fade(now);
            events.push(OverlayEvent::FadeStarted);
        }

        if let Stage::Fading(fade) = self.stage {
            if fade.is_complete(now) {
                self.close();
                events.push(OverlayEvent::Closed);
            }
        }

        events
    }

    /// Close immediately, skipping the fade. Stops both timers.
    pub fn force_close(&mut self) {
        if !self.is_closed() {
            self.close();
        }
    }

    fn close(&mut self) {
        self.progress_timer.stop();
        self.close_timer.cancel();
        self.stage = Stage::Closed;
        debug!("break overlay closed");
    }

    /// Whether the overlay has closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.stage, Stage::Closed)
    }

    /// Current countdown value.
    #[must_use]
    pub const fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Break length this overlay was created with.
    #[must_use]
    pub const fn max_seconds(&self) -> u32 {
        self.max_seconds
    }

    /// Opacity at `now`.
    #[must_use]
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.stage {
            Stage::Showing => SHOWN_OPACITY,
            Stage::Fading(fade) => fade.opacity_at(now),
            Stage::Closed => 0.0,
        }
    }

    /// Tip for the current point of the break.
    #[must_use]
    pub fn tip(&self) -> &'static str {
        let index = (self.progress_ticks / TIP_INTERVAL_SECONDS) as usize % BREAK_TIPS.len();
        BREAK_TIPS[index]
    }

    /// Render state at `now`.
    #[must_use]
    pub fn view_model(&self, now: Instant) -> OverlayViewModel {
        OverlayViewModel {
            seconds_remaining: self.seconds_remaining,
            max_seconds: self.max_seconds,
            opacity: self.opacity(now),
            tip: self.tip(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(start: Instant, millis: u64) -> Instant {
        start + StdDuration::from_millis(millis)
    }

    #[test]
    fn test_create_seeds_both_timers() {
        let now = Instant::now();
        let overlay = BreakOverlay::create(30, now);
        assert_eq!(overlay.seconds_remaining(), 30);
        assert_eq!(overlay.max_seconds(), 30);
        assert!((overlay.opacity(now) - SHOWN_OPACITY).abs() < f32::EPSILON);

        // Nothing is due before the first second
        let mut overlay = overlay;
        assert!(overlay.poll(at(now, 999)).is_empty());
    }

    #[test]
    fn test_progress_stops_itself() {
        let mut overlay = BreakOverlay::create(3, Instant::now());
        assert_eq!(overlay.progress_tick(), Some(2));
        assert_eq!(overlay.progress_tick(), Some(1));
        assert_eq!(overlay.progress_tick(), Some(0));

        // Further ticks are suppressed
        assert_eq!(overlay.progress_tick(), None);
        assert_eq!(overlay.seconds_remaining(), 0);

        // An empty bar alone does not close the overlay
        assert!(!overlay.is_closed());
        assert!((overlay.opacity(Instant::now()) - SHOWN_OPACITY).abs() < f32::EPSILON);
    }

    #[test]
    fn test_close_timer_then_fade() {
        let start = Instant::now();
        let mut overlay = BreakOverlay::create(3, start);

        assert_eq!(overlay.poll(at(start, 1000)), vec![OverlayEvent::Progress(2)]);
        assert_eq!(overlay.poll(at(start, 2000)), vec![OverlayEvent::Progress(1)]);
        assert_eq!(
            overlay.poll(at(start, 3000)),
            vec![OverlayEvent::Progress(0), OverlayEvent::FadeStarted]
        );
        assert!(!overlay.is_closed());

        let mid = overlay.opacity(at(start, 3500));
        assert!(mid > 0.0 && mid < SHOWN_OPACITY);

        assert!(overlay.poll(at(start, 3900)).is_empty());
        assert_eq!(overlay.poll(at(start, 4000)), vec![OverlayEvent::Closed]);
        assert!(overlay.is_closed());
        assert!(overlay.opacity(at(start, 4000)).abs() < f32::EPSILON);

        // Nothing fires after close
        assert!(overlay.poll(at(start, 10_000)).is_empty());
    }

    #[test]
    fn test_late_poll_keeps_progress_before_fade() {
        let start = Instant::now();
        let mut overlay = BreakOverlay::create(2, start);

        // A stalled loop catches up on both timers in order
        assert_eq!(
            overlay.poll(at(start, 2500)),
            vec![
                OverlayEvent::Progress(1),
                OverlayEvent::Progress(0),
                OverlayEvent::FadeStarted
            ]
        );
        assert_eq!(overlay.poll(at(start, 3500)), vec![OverlayEvent::Closed]);
    }

    #[test]
    fn test_force_close() {
        let start = Instant::now();
        let mut overlay = BreakOverlay::create(10, start);
        overlay.force_close();
        assert!(overlay.is_closed());
        assert_eq!(overlay.progress_tick(), None);
        assert!(overlay.poll(at(start, 20_000)).is_empty());
    }

    #[test]
    fn test_zero_break_raised() {
        let overlay = BreakOverlay::create(0, Instant::now());
        assert_eq!(overlay.max_seconds(), 1);
    }

    #[test]
    fn test_tips_rotate() {
        let mut overlay = BreakOverlay::create(60, Instant::now());
        assert_eq!(overlay.tip(), "Release your jaw.");
        for _ in 0..TIP_INTERVAL_SECONDS {
            overlay.progress_tick();
        }
        assert_eq!(overlay.tip(), "Look at something 20 feet away.");
    }

    #[test]
    fn test_view_model() {
        let start = Instant::now();
        let mut overlay = BreakOverlay::create(5, start);
        overlay.progress_tick();
        let vm = overlay.view_model(start);
        assert_eq!(vm.seconds_remaining, 4);
        assert_eq!(vm.max_seconds, 5);
        assert!((vm.opacity - SHOWN_OPACITY).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_break_countdown_and_single_close(break_seconds in 10u32..=600) {
            let start = Instant::now();
            let mut overlay = BreakOverlay::create(break_seconds, start);
            let mut values = Vec::new();
            let mut fades = Vec::new();

            for second in 1..=break_seconds + 2 {
                for event in overlay.poll(start + TICK * second) {
                    match event {
                        OverlayEvent::Progress(v) => values.push(v),
                        OverlayEvent::FadeStarted => fades.push(second),
                        OverlayEvent::Closed => {}
                    }
                }
            }

            let expected: Vec<u32> = (0..break_seconds).rev().collect();
            prop_assert_eq!(values, expected);
            prop_assert_eq!(fades, vec![break_seconds]);
            prop_assert!(overlay.is_closed());
        }
    }
}
