//! csvlite-ingest: from delimited bytes to persisted, normalized tables.
//!
//! - `loader`: decoding with encoding fallback, CSV parsing, type inference
//! - `shape`: column projection, renames and type overrides
//! - `dates`: free-form and hinted date/datetime normalization
//! - `directives`, `plan`: per-run directives
//! - `refactor`: rewriting extracted columns to lookup ids
//! - `pipeline`: the end-to-end import run

pub mod dates;
pub mod directives;
pub mod loader;
pub mod pipeline;
pub mod plan;
pub mod refactor;
pub mod shape;

pub use loader::{load_table, LoadOptions};
pub use pipeline::{run_import, InputSource};
pub use plan::ImportPlan;
