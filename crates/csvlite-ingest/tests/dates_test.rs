//! Date normalization tests.

use chrono::{Datelike, Local};
use csvlite_core::errors::{ConfigError, ImportError, NormalizeError};
use csvlite_core::types::{Column, Table, Value};
use csvlite_ingest::dates::DateNormalizer;

fn date(input: &str) -> Option<String> {
    DateNormalizer::default().parse(input).map(|p| p.to_date_string())
}

fn datetime(input: &str) -> Option<String> {
    DateNormalizer::default().parse(input).map(|p| p.to_datetime_string())
}

#[test]
fn free_form_dates() {
    assert_eq!(date("3rd May 2017").as_deref(), Some("2017-05-03"));
    assert_eq!(date("04/30/2005").as_deref(), Some("2005-04-30"));
    assert_eq!(date("30/04/2005").as_deref(), Some("2005-04-30"));
    assert_eq!(date("2017-05-03").as_deref(), Some("2017-05-03"));
    assert_eq!(date("May 3, 2017").as_deref(), Some("2017-05-03"));
    assert_eq!(date("Wednesday, 3 May 2017").as_deref(), Some("2017-05-03"));
    assert_eq!(date("Sept 1 1999").as_deref(), Some("1999-09-01"));
    assert_eq!(date("20170503").as_deref(), Some("2017-05-03"));
    assert_eq!(date("1/2/69").as_deref(), Some("1969-01-02"));
    assert_eq!(date("1/2/68").as_deref(), Some("2068-01-02"));
}

#[test]
fn year_only_values_start_the_year() {
    assert_eq!(date("2017").as_deref(), Some("2017-01-01"));
    assert_eq!(datetime("1999").as_deref(), Some("1999-01-01T00:00:00"));
    assert_eq!(date("5"), None);

    let mut table = Table::new(
        "t",
        vec![Column::new("year", vec![Value::Integer(2017), Value::Null])],
    )
    .unwrap();
    DateNormalizer::default()
        .normalize_table(&mut table, &["year".to_string()], &[])
        .unwrap();
    assert_eq!(
        table.column("year").unwrap().values(),
        &[Value::from("2017-01-01"), Value::Null]
    );
}

#[test]
fn free_form_datetimes() {
    assert_eq!(datetime("10pm on April 4 1938").as_deref(), Some("1938-04-04T22:00:00"));
    assert_eq!(datetime("5:45 10 December 2009").as_deref(), Some("2009-12-10T05:45:00"));
    assert_eq!(datetime("2009-12-10 05:45:12").as_deref(), Some("2009-12-10T05:45:12"));
    assert_eq!(datetime("10:30 pm Jan 2 2001").as_deref(), Some("2001-01-02T22:30:00"));
}

#[test]
fn offsets_are_kept_only_when_present() {
    assert_eq!(
        datetime("2019-03-01T10:00:00+05:30").as_deref(),
        Some("2019-03-01T10:00:00+05:30")
    );
    assert_eq!(datetime("2019-03-01T10:00:00Z").as_deref(), Some("2019-03-01T10:00:00+00:00"));
    assert_eq!(
        datetime("Fri, 01 Mar 2019 10:00:00 -0800").as_deref(),
        Some("2019-03-01T10:00:00-08:00")
    );
    assert_eq!(datetime("April 4 1938 10pm utc").as_deref(), Some("1938-04-04T22:00:00+00:00"));
}

#[test]
fn missing_day_and_year_default() {
    assert_eq!(date("December 2009").as_deref(), Some("2009-12-01"));
    let this_year = Local::now().year();
    assert_eq!(date("3 May"), Some(format!("{this_year}-05-03")));
}

#[test]
fn rubbish_does_not_parse() {
    for input in ["", "not a date", "Yolo", "31/31/2001", "February 30 2001", "25:00 May 1 2001"] {
        assert_eq!(date(input), None, "{input}");
    }
}

#[test]
fn format_hints_come_first() {
    let normalizer = DateNormalizer::new(vec!["%y/%d/%m".into()]);
    assert_eq!(
        normalizer.parse("03/02/01").map(|p| p.to_date_string()).as_deref(),
        Some("2003-01-02")
    );

    let normalizer = DateNormalizer::new(vec!["%d of %B in the year %Y".into()]);
    assert_eq!(
        normalizer
            .parse("6 of December in the year 2002")
            .map(|p| p.to_date_string())
            .as_deref(),
        Some("2002-12-06")
    );

    // A hint that does not match falls through to free-form parsing.
    let normalizer = DateNormalizer::new(vec!["%Y.%m.%d".into()]);
    assert_eq!(
        normalizer.parse("3rd May 2017").map(|p| p.to_date_string()).as_deref(),
        Some("2017-05-03")
    );
}

fn events() -> Table {
    Table::new(
        "events",
        vec![
            Column::new("day", vec![Value::from("3rd May 2017"), Value::Null]),
            Column::new("at", vec![Value::from("10pm on April 4 1938"), Value::from("2001-01-02")]),
            Column::new("year", vec![Value::Integer(20170503), Value::Null]),
        ],
    )
    .unwrap()
}

#[test]
fn normalizes_table_columns_in_place() {
    let mut table = events();
    DateNormalizer::default()
        .normalize_table(&mut table, &["day".into(), "year".into()], &["at".into()])
        .unwrap();

    assert_eq!(
        table.column("day").unwrap().values(),
        &[Value::from("2017-05-03"), Value::Null]
    );
    assert_eq!(
        table.column("at").unwrap().values(),
        &[Value::from("1938-04-04T22:00:00"), Value::from("2001-01-02T00:00:00")]
    );
    assert_eq!(
        table.column("year").unwrap().values(),
        &[Value::from("2017-05-03"), Value::Null]
    );
}

#[test]
fn unparsable_value_is_fatal() {
    let mut table = Table::new("t", vec![Column::new("d", vec![Value::from("soon")])]).unwrap();
    let err = DateNormalizer::default()
        .normalize_table(&mut table, &["d".into()], &[])
        .unwrap_err();
    match err {
        ImportError::Normalize(NormalizeError::UnparsableDate { column, value, .. }) => {
            assert_eq!(column, "d");
            assert_eq!(value, "soon");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_date_column_is_a_config_error() {
    let mut table = events();
    let err = DateNormalizer::default()
        .normalize_table(&mut table, &[], &["nope".into()])
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::Config(ConfigError::UnknownColumn { context: "Date", .. })
    ));
}
