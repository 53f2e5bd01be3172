//! Command-line interface for ikiflow.

pub mod args;
pub mod commands;
