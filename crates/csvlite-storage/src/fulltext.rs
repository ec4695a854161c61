//! Full-text shadow tables over imported tables.
//!
//! The shadow projection joins extracted columns back to their lookup
//! values, aliasing every repeat join to the same lookup table.

use std::fmt;
use std::sync::OnceLock;

use csvlite_core::constants::FTS_TABLE_SUFFIX;
use csvlite_core::errors::StorageError;
use csvlite_core::types::{ForeignKeyMap, FxHashMap};
use rusqlite::Connection;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

use crate::connection::writer::with_immediate_transaction;
use crate::queries::quote_ident;

/// SQLite full-text engine generations, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtsEngine {
    Fts5,
    Fts4,
    Fts3,
}

impl FtsEngine {
    const PREFERENCE: [FtsEngine; 3] = [Self::Fts5, Self::Fts4, Self::Fts3];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fts5 => "FTS5",
            Self::Fts4 => "FTS4",
            Self::Fts3 => "FTS3",
        }
    }

    /// FTS3 has no `content=` option and stores its own copy of the text.
    pub fn supports_external_content(self) -> bool {
        !matches!(self, Self::Fts3)
    }

    /// `CREATE VIRTUAL TABLE` for a shadow of `content_table` over `columns`.
    pub fn create_sql(self, fts_table: &str, content_table: &str, columns: &[String]) -> String {
        let mut args: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        if self.supports_external_content() {
            args.push(format!("content={}", quote_ident(content_table)));
        }
        format!(
            "CREATE VIRTUAL TABLE {} USING {} ({})",
            quote_ident(fts_table),
            self.as_str(),
            args.join(", ")
        )
    }
}

impl fmt::Display for FtsEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static BEST_ENGINE: OnceLock<Option<FtsEngine>> = OnceLock::new();

/// The most capable full-text engine this SQLite build offers.
/// Detected once per process on a throwaway in-memory connection.
pub fn best_engine() -> Option<FtsEngine> {
    *BEST_ENGINE.get_or_init(detect_engine)
}

fn detect_engine() -> Option<FtsEngine> {
    let conn = Connection::open_in_memory().ok()?;
    let engine = FtsEngine::PREFERENCE.into_iter().find(|engine| {
        conn.execute_batch(&format!("CREATE VIRTUAL TABLE v USING {engine} (t); DROP TABLE v;"))
            .is_ok()
    });
    debug!(engine = ?engine, "detected full-text support");
    engine
}

/// Alias for the `occurrence`-th join to `lookup` within one projection.
pub fn join_alias(lookup: &str, occurrence: usize) -> String {
    format!("table_alias_{:016x}_{}", xxh3_64(lookup.as_bytes()), occurrence)
}

/// The `SELECT` that feeds `<table>_fts`: rowid first, then one expression
/// per requested column. Extracted columns resolve through a `LEFT JOIN`
/// to their lookup table's value column.
pub fn projection_sql(table: &str, columns: &[String], foreign_keys: &ForeignKeyMap) -> String {
    let base = quote_ident(table);
    let mut select = vec![format!("{base}.rowid")];
    let mut joins = Vec::new();
    let mut seen: FxHashMap<&str, usize> = FxHashMap::default();

    for column in columns {
        match foreign_keys.get(column) {
            Some(target) => {
                let occurrence = seen.entry(target.table.as_str()).or_insert(0);
                *occurrence += 1;
                let lookup = quote_ident(&target.table);
                let source = if *occurrence > 1 {
                    quote_ident(&join_alias(&target.table, *occurrence))
                } else {
                    lookup.clone()
                };
                select.push(format!("{source}.{}", quote_ident(&target.value_column)));
                let alias_clause = if *occurrence > 1 {
                    format!(" AS {source}")
                } else {
                    String::new()
                };
                joins.push(format!(
                    "LEFT JOIN {lookup}{alias_clause} ON {base}.{} = {source}.id",
                    quote_ident(column)
                ));
            }
            None => select.push(format!("{base}.{}", quote_ident(column))),
        }
    }

    let mut sql = format!("SELECT {} FROM {base}", select.join(", "));
    for join in joins {
        sql.push(' ');
        sql.push_str(&join);
    }
    sql
}

/// Create and populate `<table>_fts` for each of `tables` in one
/// immediate transaction.
pub fn build_fulltext(
    conn: &Connection,
    engine: FtsEngine,
    tables: &[String],
    columns: &[String],
    foreign_keys: &ForeignKeyMap,
) -> Result<(), StorageError> {
    let column_list: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    with_immediate_transaction(conn, |tx| {
        for table in tables {
            let fts_table = format!("{table}{FTS_TABLE_SUFFIX}");
            tx.execute_batch(&engine.create_sql(&fts_table, table, columns))
                .map_err(|e| StorageError::on_table(&fts_table, "create full-text index", e))?;
            let populate = format!(
                "INSERT INTO {} (rowid, {}) {}",
                quote_ident(&fts_table),
                column_list.join(", "),
                projection_sql(table, columns, foreign_keys)
            );
            let rows = tx
                .execute(&populate, [])
                .map_err(|e| StorageError::on_table(&fts_table, "populate full-text index", e))?;
            info!(table = %table, fts_table = %fts_table, rows, engine = %engine, "built full-text index");
        }
        Ok(())
    })
}
