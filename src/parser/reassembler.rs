//! Collapses structured rows into polars `Date` / `Datetime` columns.
//!
//! No calendar validation happens here: months past December carry into
//! later years and out-of-range days carry into later months.

use crate::config::ParseMode;
use crate::constants::{
    CIVIL_ORIGIN_TO_UNIX_EPOCH_DAYS, MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE,
};
use crate::error::{ExcellaintError, Result};
use crate::models::StructuredRow;
use chrono::Timelike;
use polars::prelude::*;
use tracing::debug;

/// Days since 1970-01-01 for a proleptic Gregorian year/month/day.
///
/// Month and day are not range checked: month 13 is January of the next
/// year and day 32 of January is the 1st of February.
pub fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let (year, month) = normalize_year_month(year as i64, month as i64 - 1);
    first_of_month(year, month) + day as i64 - 1
}

/// Fold a zero-based month offset into `(year, month 1..=12)`
fn normalize_year_month(year: i64, month_zero_based: i64) -> (i64, i64) {
    let total = year * 12 + month_zero_based;
    (total.div_euclid(12), total.rem_euclid(12) + 1)
}

fn first_of_month(year: i64, month: i64) -> i64 {
    let y = year - if month <= 2 { 1 } else { 0 };
    let era = y.div_euclid(400);
    let year_of_era = y - era * 400;
    let shifted_month = (month + 9).rem_euclid(12);
    let day_of_year = (153 * shifted_month + 2) / 5;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - CIVIL_ORIGIN_TO_UNIX_EPOCH_DAYS
}

/// Milliseconds since the Unix epoch, counting the time of day if present.
///
/// `None` when the result does not fit in an `i64`.
pub fn epoch_millis(row: &StructuredRow) -> Option<i64> {
    let days = days_from_civil(row.year, row.month, row.day);
    let time_millis = row
        .time
        .map(|time| {
            time.hour() as i64 * MILLIS_PER_HOUR + time.minute() as i64 * MILLIS_PER_MINUTE
        })
        .unwrap_or(0);
    days.checked_mul(MILLIS_PER_DAY)?.checked_add(time_millis)
}

/// Build the output series. Null rows stay null.
pub fn reassemble(
    name: PlSmallStr,
    rows: &[Option<StructuredRow>],
    mode: ParseMode,
) -> Result<Series> {
    let series = match mode {
        ParseMode::Date => {
            let days = rows
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    row.as_ref().map(|row| {
                        let days = days_from_civil(row.year, row.month, row.day);
                        i32::try_from(days).map_err(|_| out_of_range(index, row))
                    })
                    .transpose()
                })
                .collect::<Result<Vec<Option<i32>>>>()?;
            Series::new(name, days).cast(&DataType::Date)?
        }
        ParseMode::DateTime => {
            let millis = rows
                .iter()
                .enumerate()
                .map(|(index, row)| {
                    row.as_ref()
                        .map(|row| epoch_millis(row).ok_or_else(|| out_of_range(index, row)))
                        .transpose()
                })
                .collect::<Result<Vec<Option<i64>>>>()?;
            Series::new(name, millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
    };

    debug!(
        "Reassembled {} rows into a {} column",
        series.len(),
        series.dtype()
    );
    Ok(series)
}

fn out_of_range(index: usize, row: &StructuredRow) -> ExcellaintError {
    ExcellaintError::malformed_row(
        index,
        format!("{}-{}-{}", row.year, row.month, row.day),
        "date is outside the representable range",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn epoch_days(date: NaiveDate) -> i64 {
        date.signed_duration_since(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
            .num_days()
    }

    #[test]
    fn test_days_from_civil_matches_chrono() {
        for (y, m, d) in [
            (1970, 1, 1),
            (2024, 1, 15),
            (2024, 2, 29),
            (1987, 12, 31),
            (1900, 3, 1),
            (1969, 12, 31),
        ] {
            let expected = epoch_days(NaiveDate::from_ymd_opt(y, m, d).unwrap());
            assert_eq!(days_from_civil(y, m, d), expected, "{}-{}-{}", y, m, d);
        }
    }

    #[test]
    fn test_invalid_day_rolls_over() {
        assert_eq!(days_from_civil(2024, 4, 31), days_from_civil(2024, 5, 1));
    }

    #[test]
    fn test_epoch_millis_includes_time() {
        let row = StructuredRow {
            year: 1970,
            month: 1,
            day: 2,
            time: NaiveTime::from_hms_opt(13, 45, 0),
        };
        assert_eq!(
            epoch_millis(&row),
            Some(MILLIS_PER_DAY + (13 * 3600 + 45 * 60) * 1000)
        );
    }

    #[test]
    fn test_invalid_month_rolls_into_later_years() {
        let expected = |y, m, d| epoch_days(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(days_from_civil(2024, 13, 1), expected(2025, 1, 1));
        assert_eq!(days_from_civil(2024, 14, 1), expected(2025, 2, 1));
        assert_eq!(days_from_civil(2024, 15, 1), expected(2025, 3, 1));
        assert_eq!(days_from_civil(2024, 25, 1), expected(2026, 1, 1));
        assert_eq!(days_from_civil(2024, 0, 1), expected(2023, 12, 1));
        assert!(days_from_civil(2024, 15, 1) > days_from_civil(2024, 14, 1));
    }

    #[test]
    fn test_huge_month_fails_instead_of_overflowing() {
        let row = StructuredRow {
            year: 2024,
            month: u32::MAX,
            day: u32::MAX,
            time: None,
        };
        let date = reassemble("date".into(), &[Some(row)], ParseMode::Date);
        assert!(matches!(date, Err(ExcellaintError::MalformedRow { row: 0, .. })));
    }

    #[test]
    fn test_reassemble_date_column() {
        let rows = vec![
            Some(StructuredRow {
                year: 2024,
                month: 1,
                day: 15,
                time: None,
            }),
            None,
        ];
        let series = reassemble("date".into(), &rows, ParseMode::Date).unwrap();
        assert_eq!(series.dtype(), &DataType::Date);
        assert_eq!(series.null_count(), 1);

        let physical = series.cast(&DataType::Int32).unwrap();
        let expected = epoch_days(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()) as i32;
        assert_eq!(physical.i32().unwrap().get(0), Some(expected));
    }

    #[test]
    fn test_reassemble_datetime_column() {
        let rows = vec![Some(StructuredRow {
            year: 2024,
            month: 1,
            day: 15,
            time: NaiveTime::from_hms_opt(13, 45, 0),
        })];
        let series = reassemble("stamp".into(), &rows, ParseMode::DateTime).unwrap();
        assert_eq!(
            series.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(series.name().as_str(), "stamp");
    }
}
