//! Shared create/exists behaviour for everything csvlite writes as a table.

use csvlite_core::errors::StorageError;
use rusqlite::Connection;

use crate::queries::catalog;

/// A table definition that can be materialized in the store.
pub trait Persist {
    /// Name of the persisted table.
    fn table_name(&self) -> &str;

    /// DDL statements that create the table and its companions, in order.
    fn create_statements(&self) -> Vec<String>;

    fn exists(&self, conn: &Connection) -> Result<bool, StorageError> {
        catalog::table_exists(conn, self.table_name())
    }

    fn create(&self, conn: &Connection) -> Result<(), StorageError> {
        for statement in self.create_statements() {
            conn.execute_batch(&statement)
                .map_err(|e| StorageError::on_table(self.table_name(), "create", e))?;
        }
        Ok(())
    }
}
