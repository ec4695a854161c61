//! Schema synthesis: column types, primary key, foreign keys and indexes
//! derived from an in-memory table.

use std::time::Instant;

use csvlite_core::constants::FTS_TABLE_SUFFIX;
use csvlite_core::errors::{ConfigError, StorageError};
use csvlite_core::types::{ForeignKeyMap, FxHashMap, SqlType, Table};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::connection::writer::with_immediate_transaction;
use crate::persist::Persist;
use crate::queries::{catalog, quote_ident, rows};

/// A `CREATE TABLE` definition plus its supporting indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<(String, SqlType)>,
    pub primary_key: Vec<String>,
    /// (column, lookup table) pairs.
    pub foreign_keys: Vec<(String, String)>,
    pub index_fks: bool,
}

/// What `persist_table` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOutcome {
    /// The table was created by this call rather than appended to.
    pub created: bool,
    pub rows: usize,
}

impl TableSchema {
    /// Derive the schema of `table`.
    ///
    /// Column types come from `overrides` first, then from the materialized
    /// cells. Every primary-key column must exist.
    pub fn derive(
        table: &Table,
        foreign_keys: &ForeignKeyMap,
        overrides: &FxHashMap<String, SqlType>,
        primary_key: &[String],
        index_fks: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(missing) = primary_key.iter().find(|c| !table.has_column(c)) {
            return Err(ConfigError::UnknownColumn {
                context: "Primary key",
                column: missing.clone(),
                table: table.name().to_string(),
            });
        }

        let columns = table
            .columns()
            .iter()
            .map(|c| {
                let ty = overrides.get(c.name()).copied().unwrap_or_else(|| c.sql_type());
                (c.name().to_string(), ty)
            })
            .collect();

        let foreign_keys = table
            .column_names()
            .filter_map(|c| foreign_keys.get(c).map(|t| (c.to_string(), t.table.clone())))
            .collect();

        Ok(Self {
            name: table.name().to_string(),
            columns,
            primary_key: primary_key.to_vec(),
            foreign_keys,
            index_fks,
        })
    }

    /// The `CREATE TABLE` statement.
    pub fn create_table_sql(&self) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .map(|(name, ty)| format!("    {} {}", quote_ident(name), ty))
            .collect();
        if !self.primary_key.is_empty() {
            let cols: Vec<String> = self.primary_key.iter().map(|c| quote_ident(c)).collect();
            lines.push(format!("    PRIMARY KEY ({})", cols.join(", ")));
        }
        for (column, lookup) in &self.foreign_keys {
            lines.push(format!(
                "    FOREIGN KEY ({}) REFERENCES {}(id)",
                quote_ident(column),
                quote_ident(lookup)
            ));
        }
        format!("CREATE TABLE {} (\n{}\n)", quote_ident(&self.name), lines.join(",\n"))
    }

    /// One `CREATE INDEX` per foreign-key column, unless disabled.
    pub fn index_sql(&self) -> Vec<String> {
        if !self.index_fks {
            return Vec::new();
        }
        self.foreign_keys
            .iter()
            .map(|(column, _)| {
                create_index_sql(&self.name, std::slice::from_ref(column), false)
            })
            .collect()
    }

    fn column_types(&self) -> Vec<Option<SqlType>> {
        self.columns.iter().map(|(_, ty)| Some(*ty)).collect()
    }
}

impl Persist for TableSchema {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn create_statements(&self) -> Vec<String> {
        let mut statements = vec![self.create_table_sql()];
        statements.extend(self.index_sql());
        statements
    }
}

/// `CREATE INDEX "<table>_<c1>_<c2>" ON "<table>" ("c1", "c2")`.
fn create_index_sql(table: &str, columns: &[String], if_not_exists: bool) -> String {
    let index_name = format!("{}_{}", table, columns.join("_"));
    let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    format!(
        "CREATE INDEX {}{} ON {} ({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        quote_ident(&index_name),
        quote_ident(table),
        cols.join(", ")
    )
}

/// Create the table described by `schema` (unless it exists) and append
/// the rows of `table`, all in one immediate transaction.
///
/// With `replace`, an existing table and its `<table>_fts` shadow are
/// dropped first. An existing table keeps its declared schema; cells are
/// coerced to its declared column types.
pub fn persist_table(
    conn: &Connection,
    table: &Table,
    schema: &TableSchema,
    replace: bool,
) -> Result<PersistOutcome, StorageError> {
    let started = Instant::now();
    let outcome = with_immediate_transaction(conn, |tx| {
        if replace && schema.exists(tx)? {
            catalog::drop_table(tx, &format!("{}{}", schema.name, FTS_TABLE_SUFFIX))?;
            catalog::drop_table(tx, &schema.name)?;
            debug!(table = %schema.name, "dropped existing table");
        }

        let created = !schema.exists(tx)?;
        let types = if created {
            schema.create(tx)?;
            schema.column_types()
        } else {
            let declared: FxHashMap<String, Option<SqlType>> =
                catalog::table_columns(tx, &schema.name)?.into_iter().collect();
            table
                .column_names()
                .map(|c| declared.get(c).copied().flatten())
                .collect()
        };

        let rows = rows::insert_rows(tx, table, &types)?;
        Ok(PersistOutcome { created, rows })
    })?;

    info!(
        table = %schema.name,
        rows = outcome.rows,
        created = outcome.created,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "persisted table"
    );
    Ok(outcome)
}

/// Create a custom index over `columns` if the persisted table has all of
/// them. Returns the index name, or `None` when a column is missing.
pub fn add_index(
    conn: &Connection,
    table: &str,
    columns: &[String],
) -> Result<Option<String>, StorageError> {
    let existing: Vec<String> = catalog::table_columns(conn, table)?
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    if !columns.iter().all(|c| existing.contains(c)) {
        return Ok(None);
    }
    conn.execute_batch(&create_index_sql(table, columns, true))
        .map_err(|e| StorageError::on_table(table, "create index", e))?;
    Ok(Some(format!("{}_{}", table, columns.join("_"))))
}
