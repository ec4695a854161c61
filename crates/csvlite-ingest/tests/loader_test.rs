//! Loader tests: encodings, inference, malformed records, column subsets.

use csvlite_core::config::Quoting;
use csvlite_core::errors::{ErrorCode, LoadError};
use csvlite_core::types::{SqlType, Value};
use csvlite_ingest::{load_table, LoadOptions};
use proptest::prelude::*;

fn values(table: &csvlite_core::Table, column: &str) -> Vec<Value> {
    table.column(column).unwrap().values().to_vec()
}

#[test]
fn scenario_a_types() {
    let table = load_table("test", b"county,votes\nYolo,41\nYolo,8\n", &LoadOptions::default()).unwrap();
    assert_eq!(table.name(), "test");
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["county", "votes"]);
    assert_eq!(values(&table, "county"), vec![Value::from("Yolo"), Value::from("Yolo")]);
    assert_eq!(values(&table, "votes"), vec![Value::Integer(41), Value::Integer(8)]);
    assert_eq!(table.column("votes").unwrap().sql_type(), SqlType::Integer);
}

#[test]
fn mixed_numbers_become_reals_and_na_becomes_null() {
    let csv = b"a,b,c\n41,x,true\n8.5,NA,FALSE\n,y,\n";
    let table = load_table("t", csv, &LoadOptions::default()).unwrap();
    assert_eq!(values(&table, "a"), vec![Value::Real(41.0), Value::Real(8.5), Value::Null]);
    assert_eq!(values(&table, "b"), vec![Value::from("x"), Value::Null, Value::from("y")]);
    assert_eq!(values(&table, "c"), vec![Value::Integer(1), Value::Integer(0), Value::Null]);
    assert_eq!(table.column("a").unwrap().sql_type(), SqlType::Real);
}

#[test]
fn just_strings_keeps_text_but_nulls_missing() {
    let options = LoadOptions {
        just_strings: true,
        ..LoadOptions::default()
    };
    let table = load_table("t", b"n,m\n41,\n007,NULL\n", &options).unwrap();
    assert_eq!(values(&table, "n"), vec![Value::from("41"), Value::from("007")]);
    assert_eq!(values(&table, "m"), vec![Value::Null, Value::Null]);
}

#[test]
fn latin1_input_falls_back() {
    let table = load_table("t", b"name\ncaf\xE9\n", &LoadOptions::default()).unwrap();
    assert_eq!(values(&table, "name"), vec![Value::from("café")]);
}

#[test]
fn utf8_bom_does_not_leak_into_header() {
    let table = load_table("t", b"\xEF\xBB\xBFid,name\n1,a\n", &LoadOptions::default()).unwrap();
    assert!(table.has_column("id"));
}

#[test]
fn undecodable_input_is_a_load_error() {
    let options = LoadOptions {
        encodings: vec![encoding_rs::UTF_8],
        ..LoadOptions::default()
    };
    let err = load_table("bad", b"a\n\xFF\xFE\xFD\n", &options).unwrap_err();
    assert!(matches!(err, LoadError::AllEncodingsFailed { .. }));
    assert_eq!(err.source_id(), "bad");
}

#[test]
fn malformed_record_aborts_or_is_skipped() {
    let csv = b"a,b\n1,2\n3\n4,5,6\n7,8\n";
    let err = load_table("t", csv, &LoadOptions::default()).unwrap_err();
    match &err {
        LoadError::MalformedRecord { expected, found, .. } => {
            assert_eq!(*expected, 2);
            assert_eq!(*found, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(err.error_code(), "MALFORMED_RECORD");

    let options = LoadOptions {
        skip_errors: true,
        ..LoadOptions::default()
    };
    let table = load_table("t", csv, &options).unwrap();
    assert_eq!(values(&table, "a"), vec![Value::Integer(1), Value::Integer(7)]);
}

#[test]
fn separator_and_quote_none() {
    let options = LoadOptions {
        separator: b';',
        quoting: Quoting::None,
        ..LoadOptions::default()
    };
    let table = load_table("t", b"a;b\n\"x\";2\n", &options).unwrap();
    assert_eq!(values(&table, "a"), vec![Value::from("\"x\"")]);

    let options = LoadOptions {
        separator: b';',
        ..LoadOptions::default()
    };
    let table = load_table("t", b"a;b\n\"x;y\";2\n", &options).unwrap();
    assert_eq!(values(&table, "a"), vec![Value::from("x;y")]);
}

#[test]
fn column_subset_keeps_existing_names_only() {
    let options = LoadOptions::default().with_columns(Some(vec!["b".into(), "zzz".into()]));
    let table = load_table("t", b"a,b,c\n1,2,3\n", &options).unwrap();
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["b"]);
}

#[test]
fn empty_input_has_no_header() {
    let err = load_table("empty", b"", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::NoHeader { .. }));
}

proptest! {
    #[test]
    fn integer_columns_load_exactly(numbers in prop::collection::vec(any::<i64>(), 1..40)) {
        let mut csv = String::from("n\n");
        for n in &numbers {
            csv.push_str(&format!("{n}\n"));
        }
        let table = load_table("t", csv.as_bytes(), &LoadOptions::default()).unwrap();
        let expected: Vec<Value> = numbers.iter().copied().map(Value::Integer).collect();
        prop_assert_eq!(values(&table, "n"), expected);
    }

    #[test]
    fn text_cells_survive_quoting(cells in prop::collection::vec("[a-z ,\"]{1,12}", 1..20)) {
        let mut csv = String::from("s\n");
        for cell in &cells {
            csv.push('"');
            csv.push_str(&cell.replace('"', "\"\""));
            csv.push_str("\"\n");
        }
        let options = LoadOptions { just_strings: true, ..LoadOptions::default() };
        let table = load_table("t", csv.as_bytes(), &options).unwrap();
        let expected: Vec<Value> = cells
            .iter()
            .map(|c| if csvlite_core::constants::is_na_token(c) { Value::Null } else { Value::from(c.as_str()) })
            .collect();
        prop_assert_eq!(values(&table, "s"), expected);
    }
}
