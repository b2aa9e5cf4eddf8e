//! Shared helpers for end-to-end parser tests

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::config::ParserConfig;


/// Date-mode configuration with `-` separated tokens and a fixed reference year
pub fn dash_config() -> ParserConfig {
    ParserConfig::new()
        .with_date_separator("-")
        .with_reference_year(24)
}

/// Single-column frame of optional strings
pub fn text_frame(name: &str, values: &[Option<&str>]) -> DataFrame {
    let series = Series::new(name.into(), values.to_vec());
    DataFrame::new(vec![series.into()]).unwrap()
}

/// Parsed `Date` column as chrono dates
pub fn dates(df: &DataFrame, column: &str) -> Vec<Option<NaiveDate>> {
    let series = df.column(column).unwrap().as_materialized_series();
    assert_eq!(series.dtype(), &DataType::Date);
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    series
        .cast(&DataType::Int32)
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .map(|days| days.map(|d| epoch + chrono::Duration::days(d as i64)))
        .collect()
}

/// Parsed `Datetime` column as naive datetimes
pub fn datetimes(df: &DataFrame, column: &str) -> Vec<Option<NaiveDateTime>> {
    let series = df.column(column).unwrap().as_materialized_series();
    assert_eq!(
        series.dtype(),
        &DataType::Datetime(TimeUnit::Milliseconds, None)
    );
    series
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .map(|ms| ms.and_then(chrono::DateTime::from_timestamp_millis).map(|d| d.naive_utc()))
        .collect()
}

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
