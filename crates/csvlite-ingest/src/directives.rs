//! Parsing of per-run directive strings.

use csvlite_core::constants::DEFAULT_LOOKUP_VALUE_COLUMN;
use csvlite_core::errors::ConfigError;
use csvlite_core::types::{ForeignKeyMap, LookupTarget};

/// `column[:table[:value_column]]`. The table defaults to the column name
/// and the value column to `value`.
pub fn parse_extract(directive: &str) -> Result<(String, LookupTarget), ConfigError> {
    let parts: Vec<&str> = directive.split(':').collect();
    let (column, table, value_column) = match parts.as_slice() {
        [column] => (*column, *column, DEFAULT_LOOKUP_VALUE_COLUMN),
        [column, table] => (*column, *table, DEFAULT_LOOKUP_VALUE_COLUMN),
        [column, table, value_column] => (*column, *table, *value_column),
        _ => {
            return Err(invalid("extract", directive, "expected column[:table[:value_column]]"));
        }
    };
    if column.is_empty() || table.is_empty() || value_column.is_empty() {
        return Err(invalid("extract", directive, "empty name"));
    }
    if value_column == "id" {
        return Err(invalid("extract", directive, "\"id\" is reserved for the surrogate key"));
    }
    Ok((column.to_string(), LookupTarget::new(table, value_column)))
}

/// Build the foreign-key map from every extract directive.
pub fn foreign_key_map(directives: &[String]) -> Result<ForeignKeyMap, ConfigError> {
    let mut map = ForeignKeyMap::new();
    for directive in directives {
        let (column, target) = parse_extract(directive)?;
        map.insert(&column, target)?;
    }
    Ok(map)
}

/// `col1[,col2,...]` for a custom index.
pub fn parse_index(directive: &str) -> Result<Vec<String>, ConfigError> {
    let columns: Vec<String> = directive.split(',').map(|c| c.trim().to_string()).collect();
    if columns.iter().any(String::is_empty) {
        return Err(invalid("index", directive, "empty column name"));
    }
    Ok(columns)
}

fn invalid(field: &str, value: &str, message: &str) -> ConfigError {
    ConfigError::InvalidDirective {
        field: field.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}
