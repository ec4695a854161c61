//! Read connections for file-backed databases.
//!
//! Slots open lazily: an import that never reads back pays for no extra
//! connections. Each slot is opened read-only with `query_only` set.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use csvlite_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};
use tracing::trace;

use super::pragmas::apply_read_pragmas;

const READER_SLOTS: usize = 2;

pub struct ReadPool {
    path: PathBuf,
    slots: Vec<Mutex<Option<Connection>>>,
    next: AtomicUsize,
}

impl ReadPool {
    /// A pool over `path` with `slots` reader slots (at least one).
    pub fn new(path: &Path, slots: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            slots: (0..slots.max(1)).map(|_| Mutex::new(None)).collect(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn for_path(path: &Path) -> Self {
        Self::new(path, READER_SLOTS)
    }

    /// Run `f` on the next slot, opening its connection on first use.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        let mut slot = self.slots[idx]
            .lock()
            .map_err(|_| StorageError::SqliteError {
                message: "reader slot lock poisoned".to_string(),
            })?;
        if slot.is_none() {
            trace!(slot = idx, path = %self.path.display(), "opening reader");
            *slot = Some(self.open_reader()?);
        }
        match slot.as_ref() {
            Some(conn) => f(conn),
            None => Err(StorageError::SqliteError {
                message: "reader slot empty".to_string(),
            }),
        }
    }

    /// Reader connections opened so far.
    pub fn open_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.lock().map(|s| s.is_some()).unwrap_or(false))
            .count()
    }

    fn open_reader(&self) -> Result<Connection, StorageError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        apply_read_pragmas(&conn)?;
        Ok(conn)
    }
}
