//! Core error types for toki-core.
//!
//! Parsing errors are raised before a session exists; once the interactive
//! loop runs, the only failure it reports is [`CoreError::Interrupted`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for toki-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The timer argument contained no duration tokens.
    #[error("timer specification is empty")]
    EmptySpec,

    /// A token is not a valid number-with-unit expression.
    #[error("invalid duration format")]
    InvalidDurationFormat,

    /// The user cancelled the running session.
    #[error("interrupted")]
    Interrupted,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No home or config directory could be determined
    #[error("Cannot determine configuration directory")]
    NoConfigDir,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_message_is_plain() {
        assert_eq!(CoreError::Interrupted.to_string(), "interrupted");
    }

    #[test]
    fn config_error_wraps_into_core_error() {
        let err: CoreError = ConfigError::ParseFailed("bad key".into()).into();
        assert!(matches!(err, CoreError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Failed to parse configuration: bad key"
        );
    }
}
