//! Splits raw date(-time) strings into positional tokens.

use crate::config::{ParseMode, ParserConfig};
use crate::constants::{DATE_TOKEN_COUNT, DATETIME_PART_COUNT, TIME_TOKEN_COUNT};
use crate::error::{ExcellaintError, Result};
use crate::models::{RowTokens, TokenizedColumn};
use polars::prelude::*;
use tracing::debug;

/// Look up a column and make sure it holds strings.
///
/// Columns that are already `Date` or `Datetime` are rejected as well.
pub fn textual_column<'a>(df: &'a DataFrame, column: &str) -> Result<&'a StringChunked> {
    if df.get_column_index(column).is_none() {
        let available = df
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ExcellaintError::ColumnNotFound {
            column: column.to_string(),
            available,
        });
    }

    let series = df.column(column)?.as_materialized_series();
    match series.dtype() {
        DataType::String => Ok(series.str()?),
        other => Err(ExcellaintError::UnsupportedInputType {
            column: column.to_string(),
            dtype: other.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    config: &'a ParserConfig,
}

impl<'a> Tokenizer<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Tokenize every row of a string column
    pub fn tokenize_column(&self, values: &StringChunked) -> Result<TokenizedColumn> {
        let rows = values
            .into_iter()
            .enumerate()
            .map(|(row, value)| value.map(|v| self.tokenize_value(row, v)).transpose())
            .collect::<Result<Vec<_>>>()?;

        let column = TokenizedColumn { rows };
        debug!(
            "Tokenized {} rows ({} null) in {} mode",
            column.len(),
            column.null_count(),
            self.config.mode
        );
        Ok(column)
    }

    /// Tokenize one raw value. `row` is only used for error reporting.
    pub fn tokenize_value(&self, row: usize, value: &str) -> Result<RowTokens> {
        let (date_part, time) = match self.config.mode {
            ParseMode::Date => (value, None),
            ParseMode::DateTime => {
                let parts: Vec<&str> = value.split(self.config.datetime_separator.as_str()).collect();
                if parts.len() != DATETIME_PART_COUNT {
                    return Err(ExcellaintError::malformed_row(
                        row,
                        value,
                        format!(
                            "expected a date and a time separated by {:?}, found {} part(s)",
                            self.config.datetime_separator,
                            parts.len()
                        ),
                    ));
                }

                let time_part = parts[1];
                let time_tokens = time_part.split(self.config.time_separator.as_str()).count();
                if time_tokens != TIME_TOKEN_COUNT {
                    return Err(ExcellaintError::malformed_row(
                        row,
                        value,
                        format!(
                            "expected {} time tokens separated by {:?}, found {}",
                            TIME_TOKEN_COUNT, self.config.time_separator, time_tokens
                        ),
                    ));
                }
                (parts[0], Some(time_part.to_string()))
            }
        };

        let date: Vec<String> = date_part
            .split(self.config.date_separator.as_str())
            .map(str::to_string)
            .collect();

        if date.len() != DATE_TOKEN_COUNT {
            return Err(ExcellaintError::malformed_row(
                row,
                value,
                format!(
                    "expected {} date tokens separated by {:?}, found {}",
                    DATE_TOKEN_COUNT,
                    self.config.date_separator,
                    date.len()
                ),
            ));
        }

        Ok(RowTokens { date, time })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_config() -> ParserConfig {
        ParserConfig::new().with_date_separator("-")
    }

    fn datetime_config() -> ParserConfig {
        ParserConfig::new()
            .with_mode(ParseMode::DateTime)
            .with_date_separator("-")
            .with_datetime_separator(" ")
    }

    #[test]
    fn test_date_tokens() {
        let config = date_config();
        let tokens = Tokenizer::new(&config).tokenize_value(0, "2024-01-15").unwrap();
        assert_eq!(tokens.date, vec!["2024", "01", "15"]);
        assert_eq!(tokens.time, None);
    }

    #[test]
    fn test_datetime_tokens() {
        let config = datetime_config();
        let tokens = Tokenizer::new(&config)
            .tokenize_value(0, "2024-01-15 13:45")
            .unwrap();
        assert_eq!(tokens.date, vec!["2024", "01", "15"]);
        assert_eq!(tokens.time.as_deref(), Some("13:45"));
    }

    #[test]
    fn test_two_date_tokens_is_malformed() {
        let config = date_config();
        let err = Tokenizer::new(&config).tokenize_value(3, "2024-01").unwrap_err();
        match err {
            ExcellaintError::MalformedRow { row, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(value, "2024-01");
            }
            other => panic!("Expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_time_part_is_malformed() {
        let config = datetime_config();
        let result = Tokenizer::new(&config).tokenize_value(0, "2024-01-15");
        assert!(matches!(result, Err(ExcellaintError::MalformedRow { .. })));
    }

    #[test]
    fn test_time_with_seconds_is_malformed() {
        let config = datetime_config();
        let result = Tokenizer::new(&config).tokenize_value(0, "2024-01-15 13:45:10");
        assert!(matches!(result, Err(ExcellaintError::MalformedRow { .. })));
    }

    #[test]
    fn test_nulls_become_empty_rows() {
        let config = date_config();
        let values = StringChunked::from_iter_options(
            "date".into(),
            [Some("2024-01-15"), None, Some("2024-02-20")].into_iter(),
        );
        let column = Tokenizer::new(&config).tokenize_column(&values).unwrap();
        assert_eq!(column.len(), 3);
        assert_eq!(column.null_count(), 1);
        assert!(column.rows[1].is_none());
    }

    #[test]
    fn test_textual_column_checks() {
        let df = df!(
            "date" => ["2024-01-15"],
            "id" => [1i32],
        )
        .unwrap();

        assert!(textual_column(&df, "date").is_ok());
        assert!(matches!(
            textual_column(&df, "id"),
            Err(ExcellaintError::UnsupportedInputType { .. })
        ));
        match textual_column(&df, "missing") {
            Err(ExcellaintError::ColumnNotFound { column, available }) => {
                assert_eq!(column, "missing");
                assert_eq!(available, "date, id");
            }
            other => panic!("Expected ColumnNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
