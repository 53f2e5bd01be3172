//! Configuration management for ikiflow.
//!
//! This module handles loading configuration from `~/.ikiflow/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{
    ColorSetting, Config, GeneralConfig, SessionSettings, UpdateConfig, DEFAULT_MANIFEST_URL,
};
