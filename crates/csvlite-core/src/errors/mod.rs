//! Error handling for csvlite.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod import_error;
pub mod load_error;
pub mod normalize_error;
pub mod storage_error;
pub mod table_error;

pub use config_error::ConfigError;
pub use error_code::ErrorCode;
pub use import_error::{ImportError, ImportReport};
pub use load_error::LoadError;
pub use normalize_error::NormalizeError;
pub use storage_error::StorageError;
pub use table_error::TableError;
