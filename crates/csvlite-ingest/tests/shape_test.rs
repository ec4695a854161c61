//! Shape tests: parsing, projection, renames, type overrides.

use csvlite_core::errors::{ConfigError, ImportError};
use csvlite_core::types::{Column, SqlType, Table, Value};
use csvlite_ingest::shape::{apply_shape, parse_shape, source_columns, ShapeEntry};

fn votes_table() -> Table {
    Table::new(
        "test",
        vec![
            Column::new("county", vec![Value::from("Yolo"), Value::from("Yolo")]),
            Column::new("precinct", vec![Value::from("p1"), Value::from("p2")]),
            Column::new("votes", vec![Value::Integer(41), Value::Integer(8)]),
        ],
    )
    .unwrap()
}

#[test]
fn parses_renames_and_suffixes() {
    let entries = parse_shape("county:Cty,votes:Vts(real), precinct").unwrap();
    assert_eq!(
        entries,
        vec![
            ShapeEntry {
                source: "county".into(),
                target: "Cty".into(),
                type_override: None,
            },
            ShapeEntry {
                source: "votes".into(),
                target: "Vts".into(),
                type_override: Some(SqlType::Real),
            },
            ShapeEntry::keep("precinct"),
        ]
    );
    assert_eq!(source_columns(&entries), vec!["county", "votes", "precinct"]);
}

#[test]
fn unknown_suffix_stays_in_the_name() {
    let entries = parse_shape("size(cm)").unwrap();
    assert_eq!(entries[0].target, "size(cm)");
    assert_eq!(entries[0].type_override, None);
}

#[test]
fn malformed_shapes_are_rejected() {
    for bad in ["", "a,,b", "a:", ":b", "a:x,b:x"] {
        let err = parse_shape(bad).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDirective { .. }), "{bad}: {err:?}");
    }
}

#[test]
fn scenario_d_projection() {
    let mut table = votes_table();
    let entries = parse_shape("county:Cty,votes:Vts(REAL)").unwrap();
    let overrides = apply_shape(&mut table, &entries).unwrap();

    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["Cty", "Vts"]);
    assert_eq!(overrides.get("Vts"), Some(&SqlType::Real));
    assert_eq!(overrides.len(), 1);
    assert_eq!(table.row_count(), 2);
}

#[test]
fn entry_order_wins() {
    let mut table = votes_table();
    let entries = parse_shape("votes,county").unwrap();
    apply_shape(&mut table, &entries).unwrap();
    assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["votes", "county"]);
}

#[test]
fn missing_source_column_is_a_config_error() {
    let mut table = votes_table();
    let entries = parse_shape("county,turnout").unwrap();
    let err = apply_shape(&mut table, &entries).unwrap_err();
    match err {
        ImportError::Config(ConfigError::UnknownColumn { context, column, table }) => {
            assert_eq!(context, "Shape");
            assert_eq!(column, "turnout");
            assert_eq!(table, "test");
        }
        other => panic!("unexpected {other:?}"),
    }
}
