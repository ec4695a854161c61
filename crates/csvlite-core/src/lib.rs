//! csvlite-core: shared foundation for the csvlite workspace.
//!
//! - `types`: cell values, in-memory tables, SQL column types, the foreign-key map
//! - `errors`: one error enum per subsystem plus the `ImportError` aggregate
//! - `config`: TOML-based configuration with layered resolution
//! - `tracing`: subscriber setup and structured field names
//! - `constants`: compiled defaults

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::CsvliteConfig;
pub use errors::{ErrorCode, ImportError, ImportReport};
pub use types::{Column, ForeignKeyMap, LookupTarget, SqlType, Table, Value};
