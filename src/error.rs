//! Error types for ikiflow.
//!
//! The session core never fails: out-of-range values are clamped and
//! transitions that do not apply are ignored. Everything here comes from the
//! edges of the program (config files, the terminal, the network, the CLI).

use thiserror::Error;

/// Errors that can occur in ikiflow.
#[derive(Error, Debug)]
pub enum IkiflowError {
    /// Configuration could not be read, parsed or written.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failure.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// YAML serialization or parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The terminal could not be set up, drawn or restored.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The update manifest could not be fetched or understood.
    #[error("Update check failed: {0}")]
    Update(String),

    /// A command-line argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IkiflowError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IkiflowError::Config("missing home".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing home");

        let err = IkiflowError::Update("timed out".to_string());
        assert_eq!(err.to_string(), "Update check failed: timed out");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(IkiflowError::InvalidArgument("x".to_string()).exit_code(), 2);
        assert_eq!(IkiflowError::Terminal("x".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: IkiflowError = io.into();
        assert!(matches!(err, IkiflowError::Io(_)));
    }
}
