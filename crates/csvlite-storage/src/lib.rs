//! csvlite-storage: SQLite persistence for imported tables.
//!
//! One serialized writer, pooled readers, schema synthesis, extracted
//! lookup tables with memoized ids, and full-text shadow tables.

pub mod connection;
pub mod fulltext;
pub mod lookup;
pub mod persist;
pub mod queries;
pub mod schema;

pub use connection::DatabaseManager;
pub use fulltext::FtsEngine;
pub use lookup::{LookupRegistry, LookupTable};
pub use persist::Persist;
pub use schema::{PersistOutcome, TableSchema};
