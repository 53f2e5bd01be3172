//! Timing primitives for sessions and overlays.
//!
//! Provides the countdown counter, the 1-second tick sources, and the
//! duration formatting used by every surface. Clock-driven types take the
//! current [`Instant`] from the caller so they can be driven deterministically.

use std::time::{Duration as StdDuration, Instant};

use chrono::Duration;

/// Interval of a single tick.
pub const TICK: StdDuration = StdDuration::from_secs(1);

/// A whole-second countdown that never goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    /// Total duration in seconds
    total_seconds: i64,
    /// Remaining seconds
    remaining_seconds: i64,
}

impl Countdown {
    /// Create a countdown armed with the given duration.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        let seconds = duration.num_seconds();
        let seconds = if seconds < 0 { 0 } else { seconds };
        Self {
            total_seconds: seconds,
            remaining_seconds: seconds,
        }
    }

    /// Decrement by one second.
    ///
    /// Returns true once the countdown has reached zero. The remaining value is
    /// clamped at zero, so repeated calls after exhaustion keep returning true.
    pub fn tick(&mut self) -> bool {
        self.remaining_seconds = (self.remaining_seconds - 1).max(0);
        self.remaining_seconds == 0
    }

    /// Get remaining time as Duration.
    #[must_use]
    pub const fn remaining(&self) -> Duration {
        Duration::seconds(self.remaining_seconds)
    }

    /// Remaining whole seconds.
    #[must_use]
    pub const fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds
    }

    /// Fraction of the total still remaining (1.0 when full, 0.0 when done).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn remaining_fraction(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        self.remaining_seconds as f64 / self.total_seconds as f64
    }

    /// Format remaining time as MM:SS.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_duration_mmss(self.remaining())
    }
}

/// A repeating tick source.
///
/// `poll` reports how many whole periods have elapsed since the last poll, so
/// a late poll catches up instead of dropping ticks.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: StdDuration,
    next_due: Option<Instant>,
}

impl Ticker {
    /// Create a stopped ticker. A zero period is raised to one millisecond.
    #[must_use]
    pub fn new(period: StdDuration) -> Self {
        Self {
            period: period.max(StdDuration::from_millis(1)),
            next_due: None,
        }
    }

    /// Create a stopped ticker that fires once per second.
    #[must_use]
    pub fn every_second() -> Self {
        Self::new(TICK)
    }

    /// Start (or restart) the ticker; the first tick is due one period from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Stop the ticker. Pending ticks are discarded.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Check if the ticker is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of ticks that became due at or before `now`.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while now >= due {
            fired += 1;
            due += self.period;
        }
        self.next_due = Some(due);
        fired
    }
}

/// A timer that fires exactly once after its delay.
#[derive(Debug, Clone, Copy)]
pub struct OneShot {
    delay: StdDuration,
    due: Option<Instant>,
    fired: bool,
}

impl OneShot {
    /// Create a disarmed one-shot timer.
    #[must_use]
    pub const fn new(delay: StdDuration) -> Self {
        Self {
            delay,
            due: None,
            fired: false,
        }
    }

    /// Arm the timer relative to `now`. Has no effect once it has fired.
    pub fn arm(&mut self, now: Instant) {
        if !self.fired {
            self.due = Some(now + self.delay);
        }
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Returns true on the single poll at which the timer fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => self.fire(),
            _ => false,
        }
    }

    /// Fire immediately if armed. Returns false if already fired or disarmed.
    pub fn fire(&mut self) -> bool {
        if self.due.take().is_some() && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }
}

/// A linear opacity animation.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    from: f32,
    to: f32,
    duration: StdDuration,
    started: Instant,
}

impl Fade {
    /// Start a fade at `now`.
    #[must_use]
    pub const fn new(from: f32, to: f32, duration: StdDuration, now: Instant) -> Self {
        Self {
            from,
            to,
            duration,
            started: now,
        }
    }

    /// Opacity at the given instant, clamped to the animation range.
    #[must_use]
    pub fn opacity_at(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        (self.to - self.from).mul_add(t, self.from)
    }

    /// Whether the animation has finished at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Format a duration as MM:SS.
#[must_use]
pub fn format_duration_mmss(d: Duration) -> String {
    let total_seconds = d.num_seconds().max(0);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a duration as a human-readable string.
#[must_use]
pub fn format_duration(d: Duration) -> String {
    let total_minutes = d.num_minutes();

    if total_minutes < 1 {
        let seconds = d.num_seconds();
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let seconds = d.num_seconds() % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{} hour{}", hours, if hours == 1 { "" } else { "s" }));
    }
    if minutes > 0 {
        parts.push(format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" }));
    }
    if seconds > 0 {
        parts.push(format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" }));
    }
    parts.join(", ")
}
