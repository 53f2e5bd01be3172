//! Foreground update check.

use crate::cli::args::OutputFormat;
use crate::config::Config;
use crate::error::IkiflowError;
use crate::output::format_update;
use crate::update::{check_for_update, HttpManifestSource, CURRENT_VERSION};

/// Execute the update command.
///
/// Network failures are not errors; they read as "nothing to offer".
///
/// # Errors
///
/// Returns an error if the result cannot be formatted.
pub fn update(config: &Config, format: OutputFormat) -> Result<String, IkiflowError> {
    let source = HttpManifestSource::new(config.update.manifest_url.clone());
    let offer = check_for_update(&source, CURRENT_VERSION);
    format_update(offer.as_ref(), CURRENT_VERSION, format)
}
