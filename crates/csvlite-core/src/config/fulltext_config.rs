//! Full-text index configuration.

use serde::{Deserialize, Serialize};

/// Configuration for full-text shadow tables.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FullTextConfig {
    /// Maintain a full-text shadow over each new lookup table's values. Default: true.
    pub lookup_shadows: Option<bool>,
}

impl FullTextConfig {
    /// Returns the effective lookup-shadow flag, defaulting to true.
    pub fn effective_lookup_shadows(&self) -> bool {
        self.lookup_shadows.unwrap_or(true)
    }
}
