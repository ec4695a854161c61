//! Storage connection tests: pragmas, read routing, transactions.

use std::sync::{Arc, Barrier};
use std::thread;

use csvlite_core::errors::StorageError;
use csvlite_storage::connection::pragmas::verify_wal_mode;
use csvlite_storage::connection::writer::with_immediate_transaction;
use csvlite_storage::queries::catalog;
use csvlite_storage::DatabaseManager;
use tempfile::TempDir;

#[test]
fn pragmas_set_correctly() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("test.db")).unwrap();

    db.with_writer(|conn| {
        assert!(verify_wal_mode(conn)?);

        let sync: i64 = conn.pragma_query_value(None, "synchronous", |row| row.get(0))?;
        assert_eq!(sync, 1, "synchronous should be NORMAL (1)");

        let fk: i64 = conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
        assert_eq!(fk, 1, "foreign_keys should be ON");

        let timeout: i64 = conn.pragma_query_value(None, "busy_timeout", |row| row.get(0))?;
        assert_eq!(timeout, 5000);
        Ok(())
    })
    .unwrap();
}

#[test]
fn readers_see_committed_writes() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("test.db")).unwrap();

    db.with_writer(|conn| {
        conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (1), (2);")
            .map_err(StorageError::from)
    })
    .unwrap();

    for _ in 0..10 {
        let count = db.with_reader(|conn| catalog::count_rows(conn, "t")).unwrap();
        assert_eq!(count, 2);
    }
}

#[test]
fn readers_open_on_first_use() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("test.db")).unwrap();
    assert_eq!(db.open_readers(), 0);

    db.with_writer(|conn| {
        conn.execute_batch("CREATE TABLE t (x INTEGER)")
            .map_err(StorageError::from)
    })
    .unwrap();
    assert_eq!(db.open_readers(), 0);

    assert!(db.with_reader(|conn| catalog::table_exists(conn, "t")).unwrap());
    assert_eq!(db.open_readers(), 1);
    for _ in 0..4 {
        db.with_reader(|conn| catalog::count_rows(conn, "t")).unwrap();
    }
    assert_eq!(db.open_readers(), 2);
}

#[test]
fn readers_are_read_only() {
    let dir = TempDir::new().unwrap();
    let db = DatabaseManager::open(&dir.path().join("test.db")).unwrap();

    let result = db.with_reader(|conn| {
        conn.execute_batch("CREATE TABLE nope (x)")
            .map_err(StorageError::from)
    });
    assert!(result.is_err());
}

#[test]
fn in_memory_reads_route_through_writer() {
    let db = DatabaseManager::open_in_memory().unwrap();
    assert!(db.path().is_none());

    db.with_writer(|conn| {
        conn.execute_batch("CREATE TABLE t (x); INSERT INTO t VALUES ('a');")
            .map_err(StorageError::from)
    })
    .unwrap();
    assert!(db.with_reader(|conn| catalog::table_exists(conn, "t")).unwrap());
    assert_eq!(db.open_readers(), 0);
}

#[test]
fn immediate_transaction_rolls_back_on_error() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_writer(|conn| {
        conn.execute_batch("CREATE TABLE t (x)").map_err(StorageError::from)?;
        let result: Result<(), StorageError> = with_immediate_transaction(conn, |tx| {
            tx.execute("INSERT INTO t VALUES (1)", [])?;
            Err(StorageError::DbBusy)
        });
        assert!(result.is_err());
        assert_eq!(catalog::count_rows(conn, "t")?, 0);
        assert!(conn.is_autocommit());
        Ok(())
    })
    .unwrap();
}

#[test]
fn concurrent_writers_are_serialized() {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(DatabaseManager::open(&dir.path().join("test.db")).unwrap());
    db.with_writer(|conn| {
        conn.execute_batch("CREATE TABLE t (x INTEGER)")
            .map_err(StorageError::from)
    })
    .unwrap();

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let db = Arc::clone(&db);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for j in 0..25 {
                    db.with_writer(|conn| {
                        with_immediate_transaction(conn, |tx| {
                            tx.execute("INSERT INTO t VALUES (?1)", [i * 100 + j])?;
                            Ok(())
                        })
                    })
                    .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let count = db.with_reader(|conn| catalog::count_rows(conn, "t")).unwrap();
    assert_eq!(count, 100);
}

#[test]
fn finish_checkpoints_and_optimizes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.db");
    let db = DatabaseManager::open(&path).unwrap();
    db.with_writer(|conn| {
        conn.execute_batch("CREATE TABLE t (x); INSERT INTO t VALUES (1);")
            .map_err(StorageError::from)
    })
    .unwrap();
    db.finish().unwrap();
    drop(db);

    let reopened = DatabaseManager::open(&path).unwrap();
    assert_eq!(
        reopened.with_reader(|conn| catalog::count_rows(conn, "t")).unwrap(),
        1
    );
}
