//! JSON output formatting for ikiflow.

use serde::Serialize;
use serde_json::json;

use crate::config::{Config, Paths};
use crate::error::IkiflowError;
use crate::simulate::SimulationReport;
use crate::update::UpdateOffer;

/// Format a simulation report as JSON
///
/// # Errors
///
/// Returns `IkiflowError::Parse` if JSON serialization fails.
pub fn format_report_json(report: &SimulationReport) -> Result<String, IkiflowError> {
    to_json(report)
}

/// Format the effective configuration as JSON
///
/// # Errors
///
/// Returns `IkiflowError::Parse` if JSON serialization fails.
pub fn format_config_json(config: &Config, paths: &Paths) -> Result<String, IkiflowError> {
    let output = json!({
        "path": paths.config_file,
        "exists": paths.config_file.exists(),
        "config": config,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format an update check result as JSON
///
/// # Errors
///
/// Returns `IkiflowError::Parse` if JSON serialization fails.
pub fn format_update_json(offer: Option<&UpdateOffer>, current: &str) -> Result<String, IkiflowError> {
    let output = json!({
        "current": current,
        "update_available": offer.is_some(),
        "offer": offer,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Serialize any value to pretty JSON
///
/// # Errors
///
/// Returns `IkiflowError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, IkiflowError> {
    Ok(serde_json::to_string_pretty(value)?)
}
