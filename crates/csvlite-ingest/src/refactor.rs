//! Rewrite extracted columns to lookup ids.

use std::time::Instant;

use csvlite_core::errors::StorageError;
use csvlite_core::types::{Column, ForeignKeyMap, LookupTarget, Table, Value};
use csvlite_storage::connection::writer::with_immediate_transaction;
use csvlite_storage::LookupRegistry;
use rusqlite::Connection;
use tracing::{debug, warn};

/// Replace every value of each extracted column present in `table` with the
/// id of that value in its lookup table. Nulls stay null.
///
/// All lookup inserts for the table happen in one immediate transaction.
/// The table is rewritten only after commit; on failure it is untouched and
/// the registry drops the lookup tables it may have cached ids for.
///
/// Returns the lookup tables touched, in first-use order.
pub fn refactor_table(
    conn: &Connection,
    registry: &mut LookupRegistry,
    table: &mut Table,
    foreign_keys: &ForeignKeyMap,
) -> Result<Vec<String>, StorageError> {
    let targets: Vec<(String, LookupTarget)> = foreign_keys
        .iter()
        .filter(|(column, _)| table.has_column(column))
        .map(|(column, target)| (column.to_string(), target.clone()))
        .collect();
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    let mut touched: Vec<String> = Vec::new();
    for (_, target) in &targets {
        if !touched.contains(&target.table) {
            touched.push(target.table.clone());
        }
    }

    let started = Instant::now();
    let source: &Table = table;
    let result = with_immediate_transaction(conn, |tx| {
        let mut rewritten = Vec::with_capacity(targets.len());
        for (column, target) in &targets {
            let Some(values) = source.column(column).map(Column::values) else {
                continue;
            };
            let ids = values
                .iter()
                .map(|v| {
                    registry
                        .id_for_value(tx, target, v)
                        .map(|id| id.map_or(Value::Null, Value::Integer))
                })
                .collect::<Result<Vec<_>, _>>()?;
            rewritten.push((column.clone(), ids));
        }
        Ok(rewritten)
    });

    match result {
        Ok(rewritten) => {
            for (name, ids) in rewritten {
                if let Some(column) = table.column_mut(&name) {
                    *column = Column::new(name, ids);
                }
            }
            debug!(
                table = %table.name(),
                lookups = touched.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "extracted columns"
            );
            Ok(touched)
        }
        Err(e) => {
            warn!(table = %table.name(), error = %e, "extraction rolled back");
            registry.forget(&touched);
            Err(e)
        }
    }
}
