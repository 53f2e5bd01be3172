//! ikiflow - a screen-time reminder that forces regular breaks
//!
//! This crate provides the focus/break session state machine, the floating
//! widget and break overlay it drives, and a terminal control panel that
//! hosts all three.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod output;
pub mod presenter;
pub mod session;
pub mod simulate;
pub mod tui;
pub mod update;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::IkiflowError;
pub use session::{Phase, SessionConfig, SessionController};
