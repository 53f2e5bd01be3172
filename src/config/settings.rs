//! Configuration settings for ikiflow.
//!
//! Settings are loaded from `~/.ikiflow/config.yaml`. The file is only read;
//! changes made on the control panel last for the current run.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::IkiflowError;
use crate::session::config::{
    clamp_break_seconds, DEFAULT_BREAK_SECONDS, DEFAULT_FOCUS_MINUTES, MIN_FOCUS_MINUTES,
};
use crate::session::SessionConfig;

/// Where the update manifest is published.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/designswithharshit/ikiflow/main/update.json";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Focus and break durations.
    pub session: SessionSettings,
    /// Update check settings.
    pub update: UpdateConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Focus and break durations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionSettings {
    /// Focus interval in minutes.
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    /// Break length in seconds, clamped to 10..=600 on load.
    #[serde(default = "default_break_seconds")]
    pub break_seconds: u32,
    /// Upper bound of the focus slider.
    #[serde(default = "default_max_focus_minutes")]
    pub max_focus_minutes: u32,
}

/// Update check settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateConfig {
    /// Check for a newer release at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Location of the update manifest.
    #[serde(default = "default_manifest_url")]
    pub manifest_url: String,
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_focus_minutes() -> u32 {
    DEFAULT_FOCUS_MINUTES
}

const fn default_break_seconds() -> u32 {
    DEFAULT_BREAK_SECONDS
}

const fn default_max_focus_minutes() -> u32 {
    180
}

const fn default_true() -> bool {
    true
}

fn default_manifest_url() -> String {
    DEFAULT_MANIFEST_URL.to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_seconds: default_break_seconds(),
            max_focus_minutes: default_max_focus_minutes(),
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            manifest_url: default_manifest_url(),
        }
    }
}

impl SessionSettings {
    /// Bring values into their accepted ranges.
    #[must_use]
    pub fn normalized(self) -> Self {
        let max_focus_minutes = self.max_focus_minutes.max(MIN_FOCUS_MINUTES);
        Self {
            focus_minutes: self.focus_minutes.clamp(MIN_FOCUS_MINUTES, max_focus_minutes),
            break_seconds: clamp_break_seconds(i64::from(self.break_seconds)),
            max_focus_minutes,
        }
    }

    /// Session configuration for these settings.
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::from_inputs(self.focus_minutes, i64::from(self.break_seconds))
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, IkiflowError> {
        let paths = Paths::new()?;
        Self::load_from_path(&paths.config_file)
    }

    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    /// Out-of-range durations are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, IkiflowError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            IkiflowError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|e| {
            IkiflowError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        Ok(config.normalized())
    }

    /// Clamp every value into its accepted range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.session = self.session.normalized();
        self
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), IkiflowError> {
        let contents = serde_yaml::to_string(self)?;

        std::fs::write(path, contents).map_err(|e| {
            IkiflowError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
