//! Table creation configuration.

use serde::{Deserialize, Serialize};

/// Configuration for schema synthesis and persistence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchemaConfig {
    /// Drop existing tables before importing. Default: false.
    pub replace_tables: Option<bool>,
    /// Index every extracted foreign-key column. Default: true.
    pub index_fks: Option<bool>,
}

impl SchemaConfig {
    /// Returns the effective replace flag, defaulting to false.
    pub fn effective_replace_tables(&self) -> bool {
        self.replace_tables.unwrap_or(false)
    }

    /// Returns the effective foreign-key indexing flag, defaulting to true.
    pub fn effective_index_fks(&self) -> bool {
        self.index_fks.unwrap_or(true)
    }
}
