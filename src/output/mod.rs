//! Output formatting for ikiflow.
//!
//! This module provides formatters for command results in various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::IkiflowError;
use crate::simulate::SimulationReport;
use crate::update::UpdateOffer;

pub use json::*;
pub use pretty::*;

/// Format a simulation report based on output format
///
/// # Errors
///
/// Returns `IkiflowError::Parse` if JSON serialization fails.
pub fn format_report(
    report: &SimulationReport,
    format: OutputFormat,
) -> Result<String, IkiflowError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(report)),
        OutputFormat::Json => format_report_json(report),
    }
}

/// Format the effective configuration based on output format
///
/// # Errors
///
/// Returns `IkiflowError::Parse` if JSON serialization fails.
pub fn format_config(
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, IkiflowError> {
    match format {
        OutputFormat::Pretty => Ok(format_config_pretty(config, paths)),
        OutputFormat::Json => format_config_json(config, paths),
    }
}

/// Format an update check result based on output format
///
/// # Errors
///
/// Returns `IkiflowError::Parse` if JSON serialization fails.
pub fn format_update(
    offer: Option<&UpdateOffer>,
    current: &str,
    format: OutputFormat,
) -> Result<String, IkiflowError> {
    match format {
        OutputFormat::Pretty => Ok(format_update_pretty(offer, current)),
        OutputFormat::Json => format_update_json(offer, current),
    }
}
