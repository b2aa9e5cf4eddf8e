//! Formats parsed `Date` / `Datetime` columns back into text.

use crate::constants::{DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT, UNIX_EPOCH_DAYS_FROM_CE};
use crate::error::{ExcellaintError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fmt::Write;

/// Replace a `Date` or `Datetime` column with its formatted text.
///
/// Without a format, dates render as `%Y-%m-%d` and datetimes as
/// `%Y-%m-%d %H:%M:%S`.
pub fn render_column(df: &DataFrame, column: &str, format: Option<&str>) -> Result<DataFrame> {
    let series = df
        .column(column)
        .map_err(|_| ExcellaintError::ColumnNotFound {
            column: column.to_string(),
            available: df
                .get_column_names()
                .iter()
                .map(|name| name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })?
        .as_materialized_series();

    let rendered: Vec<Option<String>> = match series.dtype() {
        DataType::Date => {
            let format = format.unwrap_or(DEFAULT_DATE_FORMAT);
            let days = series.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|value| {
                    value
                        .and_then(|d| d.checked_add(UNIX_EPOCH_DAYS_FROM_CE))
                        .and_then(NaiveDate::from_num_days_from_ce_opt)
                        .map(|date| format_value(date.format(format), format))
                        .transpose()
                })
                .collect::<Result<_>>()?
        }
        DataType::Datetime(unit, _) => {
            let format = format.unwrap_or(DEFAULT_DATETIME_FORMAT);
            let unit = *unit;
            let stamps = series.cast(&DataType::Int64)?;
            stamps
                .i64()?
                .into_iter()
                .map(|value| {
                    value
                        .and_then(|v| to_naive_datetime(v, unit))
                        .map(|stamp| format_value(stamp.format(format), format))
                        .transpose()
                })
                .collect::<Result<_>>()?
        }
        other => {
            return Err(ExcellaintError::UnsupportedInputType {
                column: column.to_string(),
                dtype: other.to_string(),
            });
        }
    };

    let mut output = df.clone();
    output.with_column(Series::new(series.name().clone(), rendered))?;
    Ok(output)
}

fn to_naive_datetime(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let millis = match unit {
        TimeUnit::Milliseconds => value,
        TimeUnit::Microseconds => value.div_euclid(1_000),
        TimeUnit::Nanoseconds => value.div_euclid(1_000_000),
    };
    DateTime::from_timestamp_millis(millis).map(|stamp| stamp.naive_utc())
}

// A format asking for fields the value does not have fails here instead of panicking
fn format_value(value: impl std::fmt::Display, format: &str) -> Result<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", value).map_err(|_| {
        ExcellaintError::configuration(format!("Format '{}' cannot render this column", format))
    })?;
    Ok(rendered)
}
