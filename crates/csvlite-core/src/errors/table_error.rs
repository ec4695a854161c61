//! In-memory table invariant errors.

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Table \"{table}\" already has a column named \"{column}\"")]
    DuplicateColumn { table: String, column: String },

    #[error("Column \"{column}\" has {found} values but table \"{table}\" has {expected} rows")]
    LengthMismatch {
        table: String,
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Table \"{table}\" has no column named \"{column}\"")]
    MissingColumn { table: String, column: String },
}

impl ErrorCode for TableError {
    fn error_code(&self) -> &'static str {
        error_code::TABLE_ERROR
    }
}
