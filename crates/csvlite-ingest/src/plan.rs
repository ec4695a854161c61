//! Per-run import directives.

use csvlite_core::errors::ConfigError;
use csvlite_core::types::ForeignKeyMap;

use crate::directives::{foreign_key_map, parse_index};
use crate::shape::{parse_shape, ShapeEntry};

/// Everything an import run does beyond plain loading.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Load every input into this table instead of one table per input.
    pub table: Option<String>,
    /// `column[:table[:value_column]]` extraction directives.
    pub extract: Vec<String>,
    pub dates: Vec<String>,
    pub datetimes: Vec<String>,
    /// strftime hints tried before free-form date parsing.
    pub datetime_formats: Vec<String>,
    pub primary_key: Vec<String>,
    /// Columns for the `<table>_fts` index on newly created tables.
    pub fulltext: Vec<String>,
    /// `col1[,col2,...]` custom index directives.
    pub indexes: Vec<String>,
    pub shape: Option<String>,
    /// Column that receives each input's logical name.
    pub filename_column: Option<String>,
    pub fixed_columns: Vec<(String, String)>,
    pub fixed_int_columns: Vec<(String, i64)>,
    pub fixed_float_columns: Vec<(String, f64)>,
}

/// An `ImportPlan` with its directive strings parsed.
#[derive(Debug, Clone)]
pub struct CompiledPlan {
    pub foreign_keys: ForeignKeyMap,
    pub shape: Option<Vec<ShapeEntry>>,
    pub indexes: Vec<Vec<String>>,
}

impl ImportPlan {
    /// Parse every directive, failing on the first malformed one.
    pub fn compile(&self) -> Result<CompiledPlan, ConfigError> {
        let shape = self.shape.as_deref().map(parse_shape).transpose()?;
        let indexes = self
            .indexes
            .iter()
            .map(|d| parse_index(d))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompiledPlan {
            foreign_keys: foreign_key_map(&self.extract)?,
            shape,
            indexes,
        })
    }

    /// Names of the columns injected after loading, in injection order.
    pub fn injected_columns(&self) -> Vec<&str> {
        self.filename_column
            .iter()
            .map(String::as_str)
            .chain(self.fixed_columns.iter().map(|(n, _)| n.as_str()))
            .chain(self.fixed_int_columns.iter().map(|(n, _)| n.as_str()))
            .chain(self.fixed_float_columns.iter().map(|(n, _)| n.as_str()))
            .collect()
    }
}
