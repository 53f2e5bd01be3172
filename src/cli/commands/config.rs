//! Config file commands.

use colored::Colorize;
use serde_json::json;
use tracing::info;

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::IkiflowError;
use crate::output::{format_config, to_json};

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written, or if
/// `init` would overwrite an existing file without `force`.
pub fn config(
    paths: &Paths,
    cmd: &ConfigCommands,
    format: OutputFormat,
) -> Result<String, IkiflowError> {
    match cmd {
        ConfigCommands::Show => {
            let config = Config::load_from_path(&paths.config_file)?;
            format_config(&config, paths, format)
        }
        ConfigCommands::Path => match format {
            OutputFormat::Json => to_json(&json!({ "path": paths.config_file })),
            OutputFormat::Pretty => Ok(paths.config_file.display().to_string()),
        },
        ConfigCommands::Init { force } => init(paths, *force, format),
    }
}

fn init(paths: &Paths, force: bool, format: OutputFormat) -> Result<String, IkiflowError> {
    if paths.config_file.exists() && !force {
        return Err(IkiflowError::Config(format!(
            "{} already exists (use --force to overwrite)",
            paths.config_file.display()
        )));
    }

    paths.ensure_dirs()?;
    Config::default().save_to_path(&paths.config_file)?;
    info!(path = %paths.config_file.display(), "wrote default config");

    match format {
        OutputFormat::Json => to_json(&json!({
            "path": paths.config_file,
            "written": true,
        })),
        OutputFormat::Pretty => Ok(format!(
            "{} Wrote {}",
            "✓".green(),
            paths.config_file.display()
        )),
    }
}
