//! Headless cycle trace.

use tracing::info;

use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::error::IkiflowError;
use crate::output::format_report;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if a duration is out of range, `--ticks 0` is given, or
/// the report cannot be formatted.
pub fn simulate(args: &SimulateArgs, format: OutputFormat) -> Result<String, IkiflowError> {
    info!(
        focus = args.focus_ticks,
        break_seconds = args.break_seconds,
        "simulating compressed cycle"
    );
    let report = crate::simulate::simulate(args.focus_ticks, args.break_seconds, args.ticks)?;
    format_report(&report, format)
}
