//! Control panel command.

use tracing::info;

use crate::cli::args::RunArgs;
use crate::config::{Config, SessionSettings};
use crate::error::IkiflowError;
use crate::session::clamp_break_seconds;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or restored.
pub fn run(config: &Config, args: &RunArgs) -> Result<String, IkiflowError> {
    let settings = effective_settings(config, args);
    let update_url = (config.update.enabled && !args.no_update_check)
        .then(|| config.update.manifest_url.clone());

    info!(
        focus_minutes = settings.focus_minutes,
        break_seconds = settings.break_seconds,
        update_check = update_url.is_some(),
        "opening control panel"
    );
    crate::tui::run(&settings, update_url)?;
    Ok(String::new())
}

/// Config file settings with command-line overrides applied.
fn effective_settings(config: &Config, args: &RunArgs) -> SessionSettings {
    let mut settings = config.session.clone();
    if let Some(minutes) = args.focus_minutes {
        settings.max_focus_minutes = settings.max_focus_minutes.max(minutes);
        settings.focus_minutes = minutes;
    }
    if let Some(raw) = args.break_seconds {
        settings.break_seconds = clamp_break_seconds(raw);
    }
    settings.normalized()
}
