//! Focus/break session core.
//!
//! - Session configuration and input clamping
//! - The focus/break state machine
//! - Tick sources, countdowns and formatting

pub mod config;
pub mod controller;
pub mod timer;

pub use config::{clamp_break_seconds, SessionConfig};
pub use controller::{Phase, SessionController, SessionEvent, SessionState};
pub use timer::{format_duration, format_duration_mmss, Countdown, Fade, OneShot, Ticker, TICK};
