//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use csvlite_core::config::CliOverrides;
use csvlite_ingest::ImportPlan;

#[derive(Debug, Parser)]
#[command(
    name = "csvlite",
    version,
    about = "Load CSV files into a SQLite database",
    long_about = "Load CSV files (or directories of them) into a SQLite database.\n\n\
                  Each file becomes a table named after the file. Repeated values can be\n\
                  extracted into lookup tables, and full-text indexes can be built over\n\
                  the imported tables."
)]
pub struct Cli {
    /// CSV files or directories to import. `-` reads stdin.
    #[arg(required = true, num_args = 1.., value_name = "PATHS")]
    pub paths: Vec<String>,

    /// Database to create or append to. `.db` is added when there is no extension.
    #[arg(value_name = "DBNAME")]
    pub dbname: String,

    /// Field separator in the input files.
    #[arg(short = 's', long)]
    pub separator: Option<String>,

    /// Quoting mode: QUOTE_MINIMAL (0), QUOTE_ALL (1), QUOTE_NONNUMERIC (2) or QUOTE_NONE (3).
    #[arg(short = 'q', long)]
    pub quoting: Option<u8>,

    /// Skip records with the wrong number of fields instead of stopping.
    #[arg(long)]
    pub skip_errors: bool,

    /// Replace tables that already exist.
    #[arg(long)]
    pub replace_tables: bool,

    /// Table to load every file into (instead of one table per file).
    #[arg(short = 't', long)]
    pub table: Option<String>,

    /// Extract a column into a lookup table: `column[:table[:value_column]]`.
    #[arg(short = 'c', long = "extract-column", action = ArgAction::Append)]
    pub extract_column: Vec<String>,

    /// Column to parse into an ISO date.
    #[arg(short = 'd', long, action = ArgAction::Append)]
    pub date: Vec<String>,

    /// Column to parse into an ISO datetime.
    #[arg(long, action = ArgAction::Append)]
    pub datetime: Vec<String>,

    /// strftime format tried before free-form date parsing.
    #[arg(long = "datetime-format", action = ArgAction::Append)]
    pub datetime_format: Vec<String>,

    /// Primary-key column.
    #[arg(long = "primary-key", action = ArgAction::Append)]
    pub primary_key: Vec<String>,

    /// Column for the full-text index.
    #[arg(short = 'f', long, action = ArgAction::Append)]
    pub fts: Vec<String>,

    /// Add an index on a column, or a compound index with `col1,col2`.
    #[arg(short = 'i', long, action = ArgAction::Append)]
    pub index: Vec<String>,

    /// Table shape: `csvcol:dbcol(TYPE),...`.
    #[arg(long)]
    pub shape: Option<String>,

    /// Add a column with this name holding each file's name.
    #[arg(long)]
    pub filename_column: Option<String>,

    /// Add a column with a fixed string value.
    #[arg(long = "fixed-column", num_args = 2, value_names = ["COLUMN", "VALUE"], action = ArgAction::Append)]
    pub fixed_column: Vec<String>,

    /// Add a column with a fixed integer value.
    #[arg(long = "fixed-column-int", num_args = 2, value_names = ["COLUMN", "VALUE"], action = ArgAction::Append)]
    pub fixed_column_int: Vec<String>,

    /// Add a column with a fixed float value.
    #[arg(long = "fixed-column-float", num_args = 2, value_names = ["COLUMN", "VALUE"], action = ArgAction::Append)]
    pub fixed_column_float: Vec<String>,

    /// Do not index extracted foreign-key columns.
    #[arg(long)]
    pub no_index_fks: bool,

    /// Do not add full-text indexes to extracted lookup tables.
    #[arg(long)]
    pub no_fulltext_fks: bool,

    /// Import every column as text (dates and shape still apply).
    #[arg(long)]
    pub just_strings: bool,

    /// Config file (defaults to `csvlite.toml` in the working directory).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The database path. Rejects `.csv`; adds `.db` when the file name has
    /// no extension.
    pub fn database_path(&self) -> Result<PathBuf> {
        if self.dbname.ends_with(".csv") {
            bail!("dbname must not end with .csv");
        }
        let path = PathBuf::from(&self.dbname);
        if path.extension().is_some() {
            Ok(path)
        } else {
            Ok(path.with_extension("db"))
        }
    }

    /// Flags that override the layered config.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            separator: self.separator.clone(),
            quoting: self.quoting,
            skip_errors: self.skip_errors.then_some(true),
            just_strings: self.just_strings.then_some(true),
            replace_tables: self.replace_tables.then_some(true),
            index_fks: self.no_index_fks.then_some(false),
            lookup_shadows: self.no_fulltext_fks.then_some(false),
        }
    }

    /// Per-run directives.
    pub fn plan(&self) -> Result<ImportPlan> {
        Ok(ImportPlan {
            table: self.table.clone(),
            extract: self.extract_column.clone(),
            dates: self.date.clone(),
            datetimes: self.datetime.clone(),
            datetime_formats: self.datetime_format.clone(),
            primary_key: self.primary_key.clone(),
            fulltext: self.fts.clone(),
            indexes: self.index.clone(),
            shape: self.shape.clone(),
            filename_column: self.filename_column.clone(),
            fixed_columns: pairs(&self.fixed_column, "--fixed-column", |v| Ok(v.to_string()))?,
            fixed_int_columns: pairs(&self.fixed_column_int, "--fixed-column-int", |v| {
                v.parse::<i64>().map_err(anyhow::Error::from)
            })?,
            fixed_float_columns: pairs(&self.fixed_column_float, "--fixed-column-float", |v| {
                v.parse::<f64>().map_err(anyhow::Error::from)
            })?,
        })
    }
}

/// `[name, value, name, value, ...]` → `[(name, parsed), ...]`.
fn pairs<T>(
    raw: &[String],
    flag: &str,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<Vec<(String, T)>> {
    raw.chunks(2)
        .map(|chunk| match chunk {
            [name, value] => {
                let parsed = parse(value)
                    .with_context(|| format!("{flag} {name}: invalid value \"{value}\""))?;
                Ok((name.clone(), parsed))
            }
            _ => bail!("{flag} expects a column name and a value"),
        })
        .collect()
}
