//! SQL column types and per-column type inference.

use std::fmt;
use std::str::FromStr;

use super::Value;

/// Declared type of a persisted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    Integer,
    Real,
    Text,
    Blob,
    Numeric,
}

impl SqlType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Numeric => "NUMERIC",
        }
    }

    /// Case-insensitive parse of a type keyword.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INTEGER" => Some(Self::Integer),
            "REAL" => Some(Self::Real),
            "TEXT" => Some(Self::Text),
            "BLOB" => Some(Self::Blob),
            "NUMERIC" => Some(Self::Numeric),
            _ => None,
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown SQL type \"{s}\""))
    }
}

/// Infer the SQL type of a column from its materialized values.
///
/// Nulls are ignored. Any text makes the column TEXT. Otherwise a fractional
/// real makes it REAL, and a column of integers or whole reals is INTEGER.
/// An all-null column is TEXT.
pub fn infer_sql_type(values: &[Value]) -> SqlType {
    let mut seen_number = false;
    let mut fractional = false;
    for value in values {
        match value {
            Value::Null => {}
            Value::Text(_) => return SqlType::Text,
            Value::Integer(_) => seen_number = true,
            Value::Real(_) => {
                seen_number = true;
                if value.as_exact_integer().is_none() {
                    fractional = true;
                }
            }
        }
    }
    match (seen_number, fractional) {
        (false, _) => SqlType::Text,
        (true, true) => SqlType::Real,
        (true, false) => SqlType::Integer,
    }
}
