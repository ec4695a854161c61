//! Configuration errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while loading or validating configuration and directives.
/// All of these are fatal and surface before the store is mutated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid {field} directive '{value}': {message}")]
    InvalidDirective {
        field: String,
        value: String,
        message: String,
    },

    #[error("{context} column \"{column}\" does not exist in table \"{table}\"")]
    UnknownColumn {
        context: &'static str,
        column: String,
        table: String,
    },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownColumn { .. } => error_code::UNKNOWN_COLUMN,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
