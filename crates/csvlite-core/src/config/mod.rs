//! Configuration system for csvlite.
//! TOML-based, layered resolution: CLI > env > project file > defaults.

pub mod csv_config;
pub mod csvlite_config;
pub mod fulltext_config;
pub mod lookup_config;
pub mod schema_config;

pub use csv_config::{CsvConfig, Quoting};
pub use csvlite_config::{CliOverrides, CsvliteConfig};
pub use fulltext_config::FullTextConfig;
pub use lookup_config::LookupConfig;
pub use schema_config::SchemaConfig;
