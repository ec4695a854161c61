//! Storage-layer errors for SQLite operations.

use super::error_code::{self, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("SQLite error during {operation} on \"{table}\": {message}")]
    TableOperation {
        table: String,
        operation: &'static str,
        message: String,
    },

    #[error("Database busy")]
    DbBusy,

    #[error("Constraint violation on \"{table}\": {message}")]
    ConstraintViolation { table: String, message: String },

    #[error("This SQLite build does not support any variant of FTS")]
    NoFullTextSupport,
}

impl StorageError {
    /// Wrap a rusqlite error with the table and operation it happened in.
    pub fn on_table(table: &str, operation: &'static str, err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref code, _) = err {
            match code.code {
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                    return Self::DbBusy;
                }
                rusqlite::ErrorCode::ConstraintViolation => {
                    return Self::ConstraintViolation {
                        table: table.to_string(),
                        message: err.to_string(),
                    };
                }
                _ => {}
            }
        }
        Self::TableOperation {
            table: table.to_string(),
            operation,
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::SqliteError {
            message: err.to_string(),
        }
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::ConstraintViolation { .. } => error_code::CONSTRAINT_ERROR,
            Self::NoFullTextSupport => error_code::NO_FULLTEXT,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
