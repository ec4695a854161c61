//! Date/datetime normalization errors.

use super::error_code::{self, ErrorCode};

/// Unparsable values in designated date columns. Always fatal: downstream
/// readers rely on canonical ISO-8601 text.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Could not parse \"{value}\" in column \"{column}\" of table \"{table}\" as a date")]
    UnparsableDate {
        table: String,
        column: String,
        value: String,
    },
}

impl ErrorCode for NormalizeError {
    fn error_code(&self) -> &'static str {
        error_code::DATE_PARSE_ERROR
    }
}
