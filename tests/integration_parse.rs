//! Integration tests for the public parsing API
//!
//! These tests drive the library the way a caller would: build a frame of
//! raw strings, configure a parser, and inspect the typed column it returns.

use chrono::{NaiveDate, NaiveDateTime};
use excellaint::{
    parse_column, render_column, DateParser, ExcellaintError, Field, ParseMode, ParserConfig,
};
use polars::prelude::*;

fn epoch_days(year: i32, month: u32, day: u32) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (NaiveDate::from_ymd_opt(year, month, day).unwrap() - epoch).num_days() as i32
}

fn date_values(df: &DataFrame, column: &str) -> Vec<Option<i32>> {
    df.column(column)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Int32)
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .collect()
}

/// Spreadsheet export with an id column, the date column and a free-text note
fn sales_export() -> DataFrame {
    df!(
        "order_id" => [101i64, 102, 103, 104],
        "ordered" => [Some("2024-01-15"), Some("2024-02-20"), None, Some("23-12-24")],
        "note" => ["first", "second", "missing date", "short year"]
    )
    .unwrap()
}

#[test]
fn test_year_first_export_end_to_end() {
    let config = ParserConfig::new()
        .with_date_separator("-")
        .with_reference_year(24);
    let parsed = parse_column(&sales_export(), "ordered", false, &config).unwrap();

    assert_eq!(parsed.shape(), (4, 3));
    assert_eq!(
        parsed.column("ordered").unwrap().dtype(),
        &DataType::Date
    );
    assert_eq!(
        date_values(&parsed, "ordered"),
        vec![
            Some(epoch_days(2024, 1, 15)),
            Some(epoch_days(2024, 2, 20)),
            None,
            Some(epoch_days(2023, 12, 24)),
        ]
    );
}

#[test]
fn test_datetime_export_end_to_end() {
    let df = df!("logged" => ["2024-01-15 13:45", "2024-01-15 00:00"]).unwrap();
    let config = ParserConfig::new()
        .with_mode(ParseMode::DateTime)
        .with_date_separator("-");
    let parsed = DateParser::new(config)
        .unwrap()
        .parse(&df, "logged", false)
        .unwrap();

    let millis: Vec<Option<i64>> = parsed
        .column("logged")
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    let expected = NaiveDateTime::parse_from_str("2024-01-15 13:45", "%Y-%m-%d %H:%M")
        .unwrap()
        .and_utc()
        .timestamp_millis();
    assert_eq!(millis[0], Some(expected));
    assert_eq!(millis[0].unwrap() - millis[1].unwrap(), (13 * 60 + 45) * 60_000);
}

#[test]
fn test_render_round_trip_to_intended_format() {
    let df = df!("date" => ["2024-01-15", "1999-12-31"]).unwrap();
    let config = ParserConfig::new()
        .with_date_separator("-")
        .with_intended_format("%d/%m/%Y")
        .unwrap();
    let parsed = parse_column(&df, "date", false, &config).unwrap();
    let rendered = render_column(&parsed, "date", config.intended_format.as_deref()).unwrap();

    let values: Vec<Option<&str>> = rendered
        .column("date")
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(values, vec![Some("15/01/2024"), Some("31/12/1999")]);
}

#[test]
fn test_two_digit_only_export_fails_with_named_fields() {
    let df = df!("date" => ["15-01-24"]).unwrap();
    let config = ParserConfig::new()
        .with_date_separator("-")
        .with_reference_year(24);

    let err = parse_column(&df, "date", false, &config).unwrap_err();
    match &err {
        ExcellaintError::AmbiguousFieldAssignment { unresolved } => {
            assert!(unresolved.contains(&Field::Year));
        }
        other => panic!("Expected AmbiguousFieldAssignment, got {:?}", other),
    }
    assert!(err.to_string().contains("Year"));
}

#[test]
fn test_malformed_row_names_the_row() {
    let df = df!("date" => ["2024-01-15", "2024-02-20", "2024-01"]).unwrap();
    let config = ParserConfig::new().with_date_separator("-");

    let err = parse_column(&df, "date", false, &config).unwrap_err();
    assert_eq!(err.row(), Some(2));
    assert!(matches!(err, ExcellaintError::MalformedRow { .. }));
}

#[test]
fn test_american_format_is_not_supported_yet() {
    let df = df!("date" => ["01/15/2024"]).unwrap();
    let config = ParserConfig::new().with_american_format(true);

    assert!(matches!(
        parse_column(&df, "date", false, &config),
        Err(ExcellaintError::UnsupportedConfiguration { .. })
    ));
}

#[test]
fn test_config_is_not_changed_by_parsing() {
    let config = ParserConfig::new().with_date_separator("-");
    let before = config.clone();
    let parser = DateParser::new(config).unwrap();
    parser
        .parse(&df!("date" => ["2024-01-15"]).unwrap(), "date", false)
        .unwrap();

    assert_eq!(parser.config(), &before);
}
