//! sqlite_master and table_info lookups.

use csvlite_core::errors::StorageError;
use csvlite_core::types::SqlType;
use rusqlite::{params, Connection};

use super::quote_ident;

/// Whether a table (plain or virtual) with this name exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool, StorageError> {
    let count: i64 = conn
        .prepare_cached("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")?
        .query_row(params![name], |row| row.get(0))?;
    Ok(count > 0)
}

/// Declared columns of a table, in order. Types that are not one of the
/// five SQLite affinities come back as `None`.
pub fn table_columns(
    conn: &Connection,
    name: &str,
) -> Result<Vec<(String, Option<SqlType>)>, StorageError> {
    let sql = format!("PRAGMA table_info({})", quote_ident(name));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        let column: String = row.get(1)?;
        let decl: String = row.get(2)?;
        Ok((column, SqlType::parse(&decl)))
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
}

/// Drop a table if it exists.
pub fn drop_table(conn: &Connection, name: &str) -> Result<(), StorageError> {
    conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(name)))
        .map_err(|e| StorageError::on_table(name, "drop", e))
}

/// Row count of a table.
pub fn count_rows(conn: &Connection, name: &str) -> Result<i64, StorageError> {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(name)),
        [],
        |row| row.get(0),
    )
    .map_err(|e| StorageError::on_table(name, "count", e))
}
