//! Column-level kind inference over raw cells.

use csvlite_core::constants::is_na_token;
use csvlite_core::types::Value;

/// What a whole column of raw cells parses as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Real,
    Boolean,
    Text,
}

/// `None` for missing-value spellings, the raw cell otherwise.
pub fn non_null(cell: &str) -> Option<&str> {
    if is_na_token(cell) {
        None
    } else {
        Some(cell)
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Infer the kind of a column: integer, then real, then boolean, else text.
/// Null cells are ignored; an all-null column is text.
pub fn infer_kind<'a, I>(cells: I) -> ColumnKind
where
    I: IntoIterator<Item = Option<&'a str>> + Clone,
{
    let present = || cells.clone().into_iter().flatten().map(str::trim);
    if present().next().is_none() {
        return ColumnKind::Text;
    }
    if present().all(|c| c.parse::<i64>().is_ok()) {
        ColumnKind::Integer
    } else if present().all(|c| c.parse::<f64>().is_ok()) {
        ColumnKind::Real
    } else if present().all(|c| parse_bool(c).is_some()) {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    }
}

/// Materialize one cell under the column's kind.
pub fn materialize(cell: Option<&str>, kind: ColumnKind) -> Value {
    let Some(raw) = cell else {
        return Value::Null;
    };
    let trimmed = raw.trim();
    let parsed = match kind {
        ColumnKind::Integer => trimmed.parse::<i64>().ok().map(Value::Integer),
        ColumnKind::Real => trimmed.parse::<f64>().ok().map(Value::Real),
        ColumnKind::Boolean => parse_bool(trimmed).map(|b| Value::Integer(i64::from(b))),
        ColumnKind::Text => None,
    };
    parsed.unwrap_or_else(|| Value::Text(raw.to_string()))
}
