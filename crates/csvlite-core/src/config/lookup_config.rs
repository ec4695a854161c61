//! Lookup table configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LOOKUP_CACHE_SIZE;

/// Configuration for extracted lookup tables.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LookupConfig {
    /// Distinct values memoized per lookup table. Default: 1000.
    pub cache_size: Option<u64>,
}

impl LookupConfig {
    /// Returns the effective cache capacity, defaulting to 1000.
    pub fn effective_cache_size(&self) -> u64 {
        self.cache_size.unwrap_or(DEFAULT_LOOKUP_CACHE_SIZE)
    }
}
