//! Connection management: write-serialized + read-pooled.

pub mod pool;
pub mod pragmas;
pub mod writer;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use csvlite_core::errors::StorageError;
use rusqlite::Connection;
use tracing::{debug, warn};

use self::pool::ReadPool;
use self::pragmas::{apply_pragmas, optimize_on_close, verify_wal_mode};

/// Manages the single write connection and the lazily opened readers.
///
/// Every mutation goes through `with_writer`, so lookup check-then-insert
/// sequences never interleave.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    readers: Option<ReadPool>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open (or create) a database at the given path and apply pragmas.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let writer = Connection::open(path)?;
        apply_pragmas(&writer)?;
        if !verify_wal_mode(&writer)? {
            warn!(path = %path.display(), "journal_mode is not WAL; readers may block on the writer");
        }
        debug!(path = %path.display(), "opened database");
        let readers = ReadPool::for_path(path);

        Ok(Self {
            writer: Mutex::new(writer),
            readers: Some(readers),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database. Reads are routed through the writer
    /// since separate connections would see separate databases.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory()?;
        apply_pragmas(&writer)?;

        Ok(Self {
            writer: Mutex::new(writer),
            readers: None,
            path: None,
        })
    }

    /// Execute a write operation with the serialized writer connection.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.writer.lock().map_err(|_| StorageError::SqliteError {
            message: "write lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    /// Execute a read operation on a reader connection. In-memory
    /// databases read through the writer.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.readers {
            Some(pool) => pool.with_conn(f),
            None => self.with_writer(f),
        }
    }

    /// Reader connections opened so far.
    pub fn open_readers(&self) -> usize {
        self.readers.as_ref().map_or(0, ReadPool::open_count)
    }

    /// Run a WAL checkpoint (TRUNCATE mode).
    pub fn checkpoint(&self) -> Result<(), StorageError> {
        self.with_writer(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(StorageError::from)
        })
    }

    /// End-of-run maintenance: checkpoint the WAL and refresh statistics.
    pub fn finish(&self) -> Result<(), StorageError> {
        self.checkpoint()?;
        self.with_writer(optimize_on_close)
    }

    /// Get the database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
