//! Extracted lookup tables: `(id INTEGER PRIMARY KEY, <value> TEXT)` with a
//! bounded value → id cache in front of the store.

use std::collections::hash_map::Entry;

use csvlite_core::errors::StorageError;
use csvlite_core::types::{FxHashMap, LookupTarget, Value};
use moka::sync::Cache;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use crate::fulltext::{self, FtsEngine};
use crate::persist::Persist;
use crate::queries::{catalog, quote_ident};

/// One lookup table and its memoized ids.
///
/// Callers must hold the single writer connection; check-then-insert is
/// only race-free under that lock.
pub struct LookupTable {
    name: String,
    value_column: String,
    shadow: Option<FtsEngine>,
    cache: Cache<String, i64>,
}

impl LookupTable {
    /// Adopt the lookup table if it exists, otherwise create it.
    ///
    /// A new table gets a full-text shadow when `shadows` is set and the
    /// build supports full-text search. An adopted table keeps its shadow
    /// only if the shadow table is already there.
    pub fn open(
        conn: &Connection,
        target: &LookupTarget,
        cache_size: u64,
        shadows: bool,
    ) -> Result<Self, StorageError> {
        let mut table = Self {
            name: target.table.clone(),
            value_column: target.value_column.clone(),
            shadow: None,
            cache: Cache::new(cache_size),
        };

        if table.exists(conn)? {
            if catalog::table_exists(conn, &table.fts_table_name())? {
                table.shadow = fulltext::best_engine();
            }
            debug!(lookup = %table.name, shadow = table.shadow.is_some(), "adopted lookup table");
        } else {
            if shadows {
                table.shadow = fulltext::best_engine();
                if table.shadow.is_none() {
                    warn!(lookup = %table.name, "no full-text support; lookup shadow skipped");
                }
            }
            table.create(conn)?;
            debug!(lookup = %table.name, shadow = table.shadow.is_some(), "created lookup table");
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// `<table>_<value_column>_fts`.
    pub fn fts_table_name(&self) -> String {
        format!("{}_{}_fts", self.name, self.value_column)
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow.is_some()
    }

    /// Surrogate id for `raw`, inserting a new row on first sight.
    /// Null has no id.
    pub fn id_for_value(&self, conn: &Connection, raw: &Value) -> Result<Option<i64>, StorageError> {
        let Some(key) = raw.normalized_text() else {
            return Ok(None);
        };
        if let Some(id) = self.cache.get(&key) {
            return Ok(Some(id));
        }

        let id = match self.find(conn, &key)? {
            Some(id) => id,
            None => {
                if conn.is_autocommit() {
                    let tx = conn.unchecked_transaction()?;
                    let id = self.insert(&tx, &key)?;
                    tx.commit()?;
                    id
                } else {
                    self.insert(conn, &key)?
                }
            }
        };

        self.cache.insert(key, id);
        Ok(Some(id))
    }

    /// Drop every memoized id.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    fn find(&self, conn: &Connection, key: &str) -> Result<Option<i64>, StorageError> {
        let sql = format!(
            "SELECT id FROM {} WHERE {} = ?1",
            quote_ident(&self.name),
            quote_ident(&self.value_column)
        );
        conn.prepare_cached(&sql)
            .and_then(|mut stmt| stmt.query_row(params![key], |row| row.get(0)).optional())
            .map_err(|e| StorageError::on_table(&self.name, "lookup", e))
    }

    fn insert(&self, conn: &Connection, key: &str) -> Result<i64, StorageError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES (?1)",
            quote_ident(&self.name),
            quote_ident(&self.value_column)
        );
        conn.prepare_cached(&sql)
            .and_then(|mut stmt| stmt.execute(params![key]))
            .map_err(|e| StorageError::on_table(&self.name, "insert", e))?;
        let id = conn.last_insert_rowid();

        if self.shadow.is_some() {
            let fts_table = self.fts_table_name();
            let sql = format!(
                "INSERT INTO {} (rowid, {}) VALUES (?1, ?2)",
                quote_ident(&fts_table),
                quote_ident(&self.value_column)
            );
            conn.prepare_cached(&sql)
                .and_then(|mut stmt| stmt.execute(params![id, key]))
                .map_err(|e| StorageError::on_table(&fts_table, "insert", e))?;
        }
        Ok(id)
    }
}

impl Persist for LookupTable {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn create_statements(&self) -> Vec<String> {
        let mut statements = vec![format!(
            "CREATE TABLE {} (\n    \"id\" INTEGER PRIMARY KEY,\n    {} TEXT\n)",
            quote_ident(&self.name),
            quote_ident(&self.value_column)
        )];
        if let Some(engine) = self.shadow {
            statements.push(engine.create_sql(
                &self.fts_table_name(),
                &self.name,
                std::slice::from_ref(&self.value_column),
            ));
        }
        statements
    }
}

/// Every lookup table touched during a run, created lazily on first use.
pub struct LookupRegistry {
    tables: FxHashMap<String, LookupTable>,
    order: Vec<String>,
    cache_size: u64,
    shadows: bool,
}

impl LookupRegistry {
    pub fn new(cache_size: u64, shadows: bool) -> Self {
        Self {
            tables: FxHashMap::default(),
            order: Vec::new(),
            cache_size,
            shadows,
        }
    }

    /// The lookup table for `target`, opening it on first use.
    pub fn ensure(
        &mut self,
        conn: &Connection,
        target: &LookupTarget,
    ) -> Result<&LookupTable, StorageError> {
        match self.tables.entry(target.table.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let table = LookupTable::open(conn, target, self.cache_size, self.shadows)?;
                self.order.push(target.table.clone());
                Ok(entry.insert(table))
            }
        }
    }

    /// Surrogate id for `raw` in the lookup table named by `target`.
    pub fn id_for_value(
        &mut self,
        conn: &Connection,
        target: &LookupTarget,
        raw: &Value,
    ) -> Result<Option<i64>, StorageError> {
        self.ensure(conn, target)?.id_for_value(conn, raw)
    }

    pub fn get(&self, name: &str) -> Option<&LookupTable> {
        self.tables.get(name)
    }

    /// Names of opened lookup tables, in first-use order.
    pub fn table_names(&self) -> &[String] {
        &self.order
    }

    /// Forget lookup tables after a rolled-back transaction. Their caches are
    /// invalidated and they are re-opened from the store on next use.
    pub fn forget(&mut self, names: &[String]) {
        for name in names {
            if let Some(table) = self.tables.remove(name) {
                table.invalidate_cache();
            }
        }
        self.order.retain(|n| !names.contains(n));
    }
}
