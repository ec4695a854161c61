//! A single cell.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use super::SqlType;

/// One cell of a table. Bool cells are stored as `Integer(1)` / `Integer(0)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer this value holds exactly, if any.
    /// Whole reals inside the `i64` range qualify.
    pub fn as_exact_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Real(f) => whole_real(*f),
            _ => None,
        }
    }

    /// Canonical text used as a lookup key. `None` for null.
    ///
    /// Whole reals render without a decimal point so `7` and `7.0` collide.
    pub fn normalized_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer(i) => Some(i.to_string()),
            Self::Real(f) => Some(match whole_real(*f) {
                Some(i) => i.to_string(),
                None => f.to_string(),
            }),
            Self::Text(s) => Some(s.clone()),
        }
    }

    /// Convert this value for binding into a column of type `ty`.
    pub fn coerce_to(&self, ty: SqlType) -> Value {
        match (ty, self) {
            (_, Self::Null) => Self::Null,
            (SqlType::Integer, Self::Real(f)) => match whole_real(*f) {
                Some(i) => Self::Integer(i),
                None => Self::Real(*f),
            },
            (SqlType::Integer, Self::Text(s)) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    Self::Integer(i)
                } else if let Some(i) = trimmed.parse::<f64>().ok().and_then(whole_real) {
                    Self::Integer(i)
                } else {
                    self.clone()
                }
            }
            (SqlType::Real, Self::Integer(i)) => Self::Real(*i as f64),
            (SqlType::Real, Self::Text(s)) => match s.trim().parse::<f64>() {
                Ok(f) => Self::Real(f),
                Err(_) => self.clone(),
            },
            (SqlType::Text, Self::Integer(_) | Self::Real(_)) => {
                Self::Text(self.to_string())
            }
            _ => self.clone(),
        }
    }
}

fn whole_real(f: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => match whole_real(*r) {
                Some(i) => write!(f, "{i}.0"),
                None => write!(f, "{r}"),
            },
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Self::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Self::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Real(f),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                Self::Text(String::from_utf8_lossy(t).into_owned())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_real_bounds() {
        assert_eq!(whole_real(7.0), Some(7));
        assert_eq!(whole_real(-0.0), Some(0));
        assert_eq!(whole_real(7.5), None);
        assert_eq!(whole_real(f64::NAN), None);
        assert_eq!(whole_real(1e19), None);
    }
}
