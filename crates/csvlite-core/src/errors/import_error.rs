//! Import run errors and non-fatal error collection.

use super::error_code::ErrorCode;
use super::{ConfigError, LoadError, NormalizeError, StorageError, TableError};

/// Errors that abort an import run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Date error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ErrorCode for ImportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Load(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Normalize(e) => e.error_code(),
            Self::Table(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
        }
    }
}

/// Outcome of a completed import run.
/// Inputs that failed to load are recorded here rather than aborting the run.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Logical names of the tables that received rows, in processing order.
    pub tables: Vec<String>,
    /// Tables created by this run (the full-text builder only touches these).
    pub created_tables: Vec<String>,
    /// Lookup tables touched by extraction.
    pub lookup_tables: Vec<String>,
    /// Total rows written across all tables.
    pub rows_written: usize,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<LoadError>,
}

impl ImportReport {
    /// Add a non-fatal error to the report.
    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    /// Returns true if every input loaded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of inputs that were skipped.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
