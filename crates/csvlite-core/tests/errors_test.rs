//! Tests for the csvlite error handling system.

use std::collections::HashSet;

use csvlite_core::errors::error_code;
use csvlite_core::errors::*;

#[test]
fn test_all_errors_have_error_code() {
    let load = LoadError::NoHeader {
        source_id: "votes".into(),
    };
    assert_eq!(load.error_code(), error_code::LOAD_ERROR);

    let config = ConfigError::FileNotFound {
        path: "/tmp/csvlite.toml".into(),
    };
    assert_eq!(config.error_code(), error_code::CONFIG_ERROR);

    let date = NormalizeError::UnparsableDate {
        table: "t".into(),
        column: "when".into(),
        value: "not a date".into(),
    };
    assert_eq!(date.error_code(), error_code::DATE_PARSE_ERROR);

    let table = TableError::MissingColumn {
        table: "t".into(),
        column: "c".into(),
    };
    assert_eq!(table.error_code(), error_code::TABLE_ERROR);

    assert_eq!(StorageError::DbBusy.error_code(), error_code::DB_BUSY);
    assert_eq!(
        StorageError::NoFullTextSupport.error_code(),
        error_code::NO_FULLTEXT
    );
}

#[test]
fn test_from_conversions() {
    let err: ImportError = ConfigError::ValidationFailed {
        field: "csv.quoting".into(),
        message: "bad".into(),
    }
    .into();
    assert!(matches!(err, ImportError::Config(_)));
    assert_eq!(err.error_code(), error_code::CONFIG_ERROR);

    let err: ImportError = StorageError::DbBusy.into();
    assert_eq!(err.error_code(), error_code::DB_BUSY);

    let err: ImportError = LoadError::MalformedRecord {
        source_id: "x".into(),
        line: 3,
        expected: 2,
        found: 3,
    }
    .into();
    assert_eq!(err.error_code(), error_code::MALFORMED_RECORD);
}

#[test]
fn test_coded_string_format() {
    let err = ConfigError::UnknownColumn {
        context: "Primary key",
        column: "id".into(),
        table: "votes".into(),
    };
    assert_eq!(
        err.coded_string(),
        "[UNKNOWN_COLUMN] Primary key column \"id\" does not exist in table \"votes\""
    );
}

#[test]
fn test_error_codes_unique() {
    let codes = [
        error_code::LOAD_ERROR,
        error_code::ENCODING_ERROR,
        error_code::MALFORMED_RECORD,
        error_code::CONFIG_ERROR,
        error_code::UNKNOWN_COLUMN,
        error_code::DATE_PARSE_ERROR,
        error_code::TABLE_ERROR,
        error_code::STORAGE_ERROR,
        error_code::DB_BUSY,
        error_code::CONSTRAINT_ERROR,
        error_code::NO_FULLTEXT,
    ];
    let unique: HashSet<_> = codes.iter().collect();
    assert_eq!(unique.len(), codes.len());
}

#[test]
fn test_storage_error_from_rusqlite_busy() {
    let busy = rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
        None,
    );
    assert!(matches!(
        StorageError::on_table("t", "insert", busy),
        StorageError::DbBusy
    ));

    let other = rusqlite::Error::QueryReturnedNoRows;
    match StorageError::on_table("t", "insert", other) {
        StorageError::TableOperation {
            table, operation, ..
        } => {
            assert_eq!(table, "t");
            assert_eq!(operation, "insert");
        }
        e => panic!("unexpected {e:?}"),
    }
}

#[test]
fn test_import_report_collects_load_errors() {
    let mut report = ImportReport::default();
    assert!(report.is_clean());
    report.add_error(LoadError::NoHeader {
        source_id: "empty".into(),
    });
    assert!(!report.is_clean());
    assert_eq!(report.error_count(), 1);
    assert_eq!(report.errors[0].source_id(), "empty");
}
