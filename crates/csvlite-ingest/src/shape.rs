//! Shape strings: `county:Cty,votes:Vts(REAL)`.
//!
//! Each entry keeps a source column, optionally renames it, and optionally
//! forces its SQL type. Columns not named are dropped.

use csvlite_core::errors::{ConfigError, ImportError, TableError};
use csvlite_core::types::{FxHashMap, SqlType, Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeEntry {
    pub source: String,
    pub target: String,
    pub type_override: Option<SqlType>,
}

impl ShapeEntry {
    /// An entry that keeps `name` unchanged.
    pub fn keep(name: &str) -> Self {
        Self {
            source: name.to_string(),
            target: name.to_string(),
            type_override: None,
        }
    }
}

/// Parse a shape string into ordered entries.
pub fn parse_shape(shape: &str) -> Result<Vec<ShapeEntry>, ConfigError> {
    let mut entries: Vec<ShapeEntry> = Vec::new();
    for raw in shape.split(',').map(str::trim) {
        let (body, type_override) = split_type_suffix(raw);
        let (source, target) = match body.split_once(':') {
            Some((source, target)) => (source, target),
            None => (body, body),
        };
        if source.is_empty() || target.is_empty() {
            return Err(invalid(shape, format!("empty column name in entry \"{raw}\"")));
        }
        if entries.iter().any(|e| e.target == target) {
            return Err(invalid(shape, format!("column \"{target}\" appears twice")));
        }
        entries.push(ShapeEntry {
            source: source.to_string(),
            target: target.to_string(),
            type_override,
        });
    }
    Ok(entries)
}

/// `votes:Vts(real)` → (`votes:Vts`, Some(REAL)). Unknown suffixes stay
/// part of the name.
fn split_type_suffix(entry: &str) -> (&str, Option<SqlType>) {
    if let Some(open) = entry.rfind('(') {
        if let Some(inner) = entry[open + 1..].strip_suffix(')') {
            if let Some(ty) = SqlType::parse(inner) {
                return (&entry[..open], Some(ty));
            }
        }
    }
    (entry, None)
}

fn invalid(shape: &str, message: String) -> ConfigError {
    ConfigError::InvalidDirective {
        field: "shape".to_string(),
        value: shape.to_string(),
        message,
    }
}

/// Source columns the loader needs to keep.
pub fn source_columns(entries: &[ShapeEntry]) -> Vec<String> {
    entries.iter().map(|e| e.source.clone()).collect()
}

/// Project, rename and reorder `table` per `entries`. Returns the type
/// overrides keyed by target column name.
pub fn apply_shape(
    table: &mut Table,
    entries: &[ShapeEntry],
) -> Result<FxHashMap<String, SqlType>, ImportError> {
    let mut columns = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut column = table.take_column(&entry.source).map_err(|e| match e {
            TableError::MissingColumn { table, column } => ImportError::Config(
                ConfigError::UnknownColumn {
                    context: "Shape",
                    column,
                    table,
                },
            ),
            other => ImportError::Table(other),
        })?;
        column.set_name(entry.target.as_str());
        columns.push(column);
    }
    table.replace_columns(columns)?;

    Ok(entries
        .iter()
        .filter_map(|e| e.type_override.map(|ty| (e.target.clone(), ty)))
        .collect())
}
