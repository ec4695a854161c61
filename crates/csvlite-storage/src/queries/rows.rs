//! Bulk row insert and generic reads.

use csvlite_core::errors::StorageError;
use csvlite_core::types::{SqlType, Table, Value};
use rusqlite::{params_from_iter, Connection, Params};

use super::quote_ident;

/// Insert every row of `table` into the persisted table of the same name.
/// Cells are coerced to `types[i]` when given.
pub fn insert_rows(
    conn: &Connection,
    table: &Table,
    types: &[Option<SqlType>],
) -> Result<usize, StorageError> {
    let name = table.name();
    let columns: Vec<String> = table.column_names().map(quote_ident).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(name),
        columns.join(", "),
        placeholders.join(", ")
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| StorageError::on_table(name, "prepare insert", e))?;

    let width = table.columns().len();
    for row in 0..table.row_count() {
        let values = (0..width).map(|col| {
            let cell = table.cell(row, col).unwrap_or(&Value::Null);
            match types.get(col).copied().flatten() {
                Some(ty) => cell.coerce_to(ty),
                None => cell.clone(),
            }
        });
        stmt.execute(params_from_iter(values))
            .map_err(|e| StorageError::on_table(name, "insert", e))?;
    }
    Ok(table.row_count())
}

/// Run an arbitrary read query and collect every row as cells.
pub fn select_rows<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Vec<Value>>, StorageError> {
    let mut stmt = conn.prepare(sql)?;
    let width = stmt.column_count();
    let rows = stmt.query_map(params, |row| {
        (0..width).map(|i| row.get::<_, Value>(i)).collect()
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(StorageError::from)
}
