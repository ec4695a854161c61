//! Column-aligned in-memory tables.

use super::{infer_sql_type, FxHashSet, SqlType, Value};
use crate::errors::TableError;

/// A named column. Values are aligned by row position with its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn sql_type(&self) -> SqlType {
        infer_sql_type(&self.values)
    }
}

/// An ordered set of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that names are unique and lengths agree.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self, TableError> {
        let name = name.into();
        check_columns(&name, &columns)?;
        Ok(Self { name, columns })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Cell at (`row`, `col`) by positional index.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.values.get(row))
    }

    /// Append a column. Its length must match the table's row count unless
    /// the table has no columns yet.
    pub fn push_column(&mut self, column: Column) -> Result<(), TableError> {
        if self.has_column(&column.name) {
            return Err(TableError::DuplicateColumn {
                table: self.name.clone(),
                column: column.name,
            });
        }
        let found = column.len();
        if !self.columns.is_empty() && found != self.row_count() {
            return Err(TableError::LengthMismatch {
                table: self.name.clone(),
                column: column.name,
                expected: self.row_count(),
                found,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Append a column holding `value` in every row.
    pub fn push_constant(&mut self, name: &str, value: Value) -> Result<(), TableError> {
        let values = vec![value; self.row_count()];
        self.push_column(Column::new(name, values))
    }

    /// Set every row of `name` to `value`. An existing column is overwritten
    /// in place; otherwise the column is appended.
    pub fn set_constant(&mut self, name: &str, value: Value) -> Result<(), TableError> {
        match self.column_mut(name) {
            Some(column) => {
                column.values_mut().fill(value);
                Ok(())
            }
            None => self.push_constant(name, value),
        }
    }

    /// Remove and return the named column.
    pub fn take_column(&mut self, name: &str) -> Result<Column, TableError> {
        let idx = self.position(name).ok_or_else(|| TableError::MissingColumn {
            table: self.name.clone(),
            column: name.to_string(),
        })?;
        Ok(self.columns.remove(idx))
    }

    /// Replace all columns at once, re-checking the invariants.
    pub fn replace_columns(&mut self, columns: Vec<Column>) -> Result<(), TableError> {
        check_columns(&self.name, &columns)?;
        self.columns = columns;
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

fn check_columns(table: &str, columns: &[Column]) -> Result<(), TableError> {
    let mut seen = FxHashSet::default();
    let expected = columns.first().map_or(0, Column::len);
    for column in columns {
        if !seen.insert(column.name.as_str()) {
            return Err(TableError::DuplicateColumn {
                table: table.to_string(),
                column: column.name.clone(),
            });
        }
        if column.len() != expected {
            return Err(TableError::LengthMismatch {
                table: table.to_string(),
                column: column.name.clone(),
                expected,
                found: column.len(),
            });
        }
    }
    Ok(())
}
