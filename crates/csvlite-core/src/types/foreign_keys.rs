//! Source column to lookup table routing.

use super::FxHashMap;
use crate::errors::ConfigError;

/// Where an extracted column's values live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupTarget {
    pub table: String,
    pub value_column: String,
}

impl LookupTarget {
    pub fn new(table: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            value_column: value_column.into(),
        }
    }
}

/// Maps source column names to lookup tables. Built once per run.
///
/// Several source columns may share one lookup table, but every route into
/// a given lookup table must agree on its value column.
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyMap {
    routes: FxHashMap<String, LookupTarget>,
    order: Vec<String>,
}

impl ForeignKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `column` into `target`. Repeating an identical route is a no-op.
    pub fn insert(&mut self, column: &str, target: LookupTarget) -> Result<(), ConfigError> {
        if let Some(existing) = self.routes.get(column) {
            if *existing == target {
                return Ok(());
            }
            return Err(ConfigError::InvalidDirective {
                field: "extract".to_string(),
                value: column.to_string(),
                message: format!(
                    "column already extracted to {}.{}",
                    existing.table, existing.value_column
                ),
            });
        }
        if let Some(clash) = self
            .routes
            .values()
            .find(|t| t.table == target.table && t.value_column != target.value_column)
        {
            return Err(ConfigError::InvalidDirective {
                field: "extract".to_string(),
                value: column.to_string(),
                message: format!(
                    "lookup table \"{}\" already uses value column \"{}\", not \"{}\"",
                    target.table, clash.value_column, target.value_column
                ),
            });
        }
        self.routes.insert(column.to_string(), target);
        self.order.push(column.to_string());
        Ok(())
    }

    pub fn get(&self, column: &str) -> Option<&LookupTarget> {
        self.routes.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.routes.contains_key(column)
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Routes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LookupTarget)> {
        self.order
            .iter()
            .filter_map(|c| self.routes.get(c).map(|t| (c.as_str(), t)))
    }

    /// Distinct lookup targets in first-seen order.
    pub fn targets(&self) -> Vec<&LookupTarget> {
        let mut out: Vec<&LookupTarget> = Vec::new();
        for (_, target) in self.iter() {
            if !out.iter().any(|t| t.table == target.table) {
                out.push(target);
            }
        }
        out
    }
}
