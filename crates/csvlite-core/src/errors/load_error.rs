//! Input loading errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while turning one input stream into a table.
/// The pipeline logs these and continues with the remaining inputs.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {source_id}: {source}")]
    Io {
        source_id: String,
        source: std::io::Error,
    },

    #[error("Could not decode {source_id}: tried {tried}")]
    AllEncodingsFailed { source_id: String, tried: String },

    #[error("Malformed record in {source_id} at line {line}: expected {expected} fields, saw {found}")]
    MalformedRecord {
        source_id: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("CSV parse error in {source_id}: {message}")]
    Parse { source_id: String, message: String },

    #[error("No header row in {source_id}")]
    NoHeader { source_id: String },
}

impl LoadError {
    /// The logical name of the input that failed.
    pub fn source_id(&self) -> &str {
        match self {
            Self::Io { source_id, .. }
            | Self::AllEncodingsFailed { source_id, .. }
            | Self::MalformedRecord { source_id, .. }
            | Self::Parse { source_id, .. }
            | Self::NoHeader { source_id } => source_id,
        }
    }
}

impl ErrorCode for LoadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AllEncodingsFailed { .. } => error_code::ENCODING_ERROR,
            Self::MalformedRecord { .. } => error_code::MALFORMED_RECORD,
            _ => error_code::LOAD_ERROR,
        }
    }
}
