//! Session configuration and input-boundary clamping.
//!
//! Values are clamped here, before they reach the controller. The controller
//! itself accepts whatever [`SessionConfig`] it is given.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Default focus interval in minutes.
pub const DEFAULT_FOCUS_MINUTES: u32 = 30;

/// Default break length in seconds.
pub const DEFAULT_BREAK_SECONDS: u32 = 300;

/// Shortest accepted break.
pub const MIN_BREAK_SECONDS: u32 = 10;

/// Longest accepted break.
pub const MAX_BREAK_SECONDS: u32 = 600;

/// Shortest accepted focus interval.
pub const MIN_FOCUS_MINUTES: u32 = 1;

/// Clamp a raw break-seconds input to `[10, 600]`.
#[must_use]
pub fn clamp_break_seconds(raw: i64) -> u32 {
    let clamped = raw.clamp(i64::from(MIN_BREAK_SECONDS), i64::from(MAX_BREAK_SECONDS));
    u32::try_from(clamped).unwrap_or(MAX_BREAK_SECONDS)
}

/// Immutable snapshot of the durations used for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Length of the focus interval in whole seconds.
    focus_seconds: i64,
    /// Length of the break overlay in whole seconds.
    break_seconds: u32,
}

impl SessionConfig {
    /// Build a config from the control-panel units (minutes and seconds).
    ///
    /// Break seconds are clamped; focus minutes are taken as given.
    #[must_use]
    pub fn from_inputs(focus_minutes: u32, break_seconds: i64) -> Self {
        Self {
            focus_seconds: i64::from(focus_minutes) * 60,
            break_seconds: clamp_break_seconds(break_seconds),
        }
    }

    /// Build a config with an arbitrary focus length.
    ///
    /// Used to compress a cycle into a handful of ticks. The break length is
    /// still raised to at least one second so an overlay always has a duration.
    #[must_use]
    pub fn with_durations(focus: Duration, break_seconds: u32) -> Self {
        Self {
            focus_seconds: focus.num_seconds().max(1),
            break_seconds: break_seconds.max(1),
        }
    }

    /// Focus interval.
    #[must_use]
    pub const fn focus_duration(&self) -> Duration {
        Duration::seconds(self.focus_seconds)
    }

    /// Break length in seconds.
    #[must_use]
    pub const fn break_seconds(&self) -> u32 {
        self.break_seconds
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_inputs(DEFAULT_FOCUS_MINUTES, i64::from(DEFAULT_BREAK_SECONDS))
    }
}
