//! Stable error codes for the outer surface.

/// Every error enum implements this to expose a stable code string
/// alongside its human-readable message.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "LOAD_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const ENCODING_ERROR: &str = "ENCODING_ERROR";
pub const MALFORMED_RECORD: &str = "MALFORMED_RECORD";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const UNKNOWN_COLUMN: &str = "UNKNOWN_COLUMN";
pub const DATE_PARSE_ERROR: &str = "DATE_PARSE_ERROR";
pub const TABLE_ERROR: &str = "TABLE_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const CONSTRAINT_ERROR: &str = "CONSTRAINT_ERROR";
pub const NO_FULLTEXT: &str = "NO_FULLTEXT";
