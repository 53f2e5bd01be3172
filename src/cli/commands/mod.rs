//! Command implementations for ikiflow.
//!
//! Every command returns the text to print, already formatted for the
//! requested output format.

mod completions;
mod config;
mod run;
mod simulate;
mod update;

pub use completions::completions;
pub use config::config;
pub use run::run;
pub use simulate::simulate;
pub use update::update;
