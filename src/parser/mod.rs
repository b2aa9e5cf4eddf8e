//! Date column parsing pipeline.
//!
//! Turns a column of ambiguous date strings into a typed `Date` or
//! `Datetime` column using statistics gathered over the whole column.
//!
//! ## Architecture
//!
//! - [`tokenizer`] - splits each raw value into date tokens and a time token
//! - [`statistics`] - per-position widths and numeric maxima for the column
//! - [`classifier`] - maps token positions to Year/Month/Day
//! - [`century`] - expands two-digit years
//! - [`time`] - parses `HH:MM` tokens
//! - [`reassembler`] - collapses resolved rows into a polars column
//! - [`render`] - formats parsed columns back into text
//!
//! Statistics and classification are computed once per call and applied to
//! every row. Any failure aborts the whole call.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use excellaint::{DateParser, ParserConfig};
//! use polars::prelude::*;
//!
//! # fn example() -> excellaint::Result<()> {
//! let df = df!("date" => ["2024-01-15", "2024-02-20"])?;
//! let parser = DateParser::new(ParserConfig::new().with_date_separator("-"))?;
//! let parsed = parser.parse(&df, "date", false)?;
//! assert_eq!(parsed.column("date")?.dtype(), &DataType::Date);
//! # Ok(())
//! # }
//! ```

pub mod century;
pub mod classifier;
pub mod reassembler;
pub mod render;
pub mod statistics;
pub mod time;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

pub use century::CenturyResolver;
pub use classifier::{FieldClassifier, YearWidthClassifier};
pub use render::render_column;
pub use statistics::collect_statistics;
pub use time::TimeParser;
pub use tokenizer::Tokenizer;

use crate::config::{ParseMode, ParserConfig};
use crate::error::{ExcellaintError, Result};
use crate::models::{FieldAssignment, ParseReport, ParseStage, RowTokens, StructuredRow, TokenizedColumn};
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

/// Parses date string columns with a fixed configuration
#[derive(Debug)]
pub struct DateParser {
    config: ParserConfig,
    classifier: Box<dyn FieldClassifier>,
}

impl DateParser {
    /// Validate the configuration and build a parser using the year-width classifier
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        if config.verbose_config {
            info!("{}", config);
        } else {
            debug!("{}", config);
        }
        Ok(Self {
            config,
            classifier: Box::new(YearWidthClassifier),
        })
    }

    /// Swap in a different classification strategy
    pub fn with_classifier(mut self, classifier: impl FieldClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `column` and return a new frame with it replaced by a typed column.
    ///
    /// `check_sorted` is reserved and currently fails with
    /// [`ExcellaintError::NotImplemented`].
    pub fn parse(&self, df: &DataFrame, column: &str, check_sorted: bool) -> Result<DataFrame> {
        self.parse_with_report(df, column, check_sorted)
            .map(|(output, _)| output)
    }

    /// Same as [`DateParser::parse`], also returning what the pipeline inferred
    pub fn parse_with_report(
        &self,
        df: &DataFrame,
        column: &str,
        check_sorted: bool,
    ) -> Result<(DataFrame, ParseReport)> {
        if check_sorted {
            return Err(ExcellaintError::NotImplemented {
                feature: "check_sorted".to_string(),
            });
        }

        let start_time = Instant::now();
        let mut stage = ParseStage::Start;
        debug!("Parsing column '{}' ({} rows)", column, df.height());

        let values = tokenizer::textual_column(df, column)?;
        let tokens = Tokenizer::new(&self.config).tokenize_column(values)?;
        advance(&mut stage, ParseStage::Tokenized);

        let statistics = collect_statistics(&tokens)?;
        advance(&mut stage, ParseStage::StatisticsCollected);

        let (rows, assignment) = if tokens.null_count() == tokens.len() {
            debug!("Column '{}' has no non-null values, skipping classification", column);
            (vec![None; tokens.len()], None)
        } else {
            debug!("Classifying with the {} strategy", self.classifier.name());
            let assignment = self.classifier.classify(&statistics, &self.config)?;
            let unresolved = assignment.invalid_fields(statistics.position_count());
            if !unresolved.is_empty() {
                debug!(
                    "The {} strategy returned an unusable assignment: {}",
                    self.classifier.name(),
                    assignment
                );
                return Err(ExcellaintError::AmbiguousFieldAssignment { unresolved });
            }
            advance(&mut stage, ParseStage::FieldsClassified);

            let rows = self.resolve_rows(values, &tokens, &assignment)?;
            advance(&mut stage, ParseStage::RowResolved);
            (rows, Some(assignment))
        };

        let series = reassembler::reassemble(values.name().clone(), &rows, self.config.mode)?;
        advance(&mut stage, ParseStage::Reassembled);

        let mut output = df.clone();
        output.with_column(series)?;
        advance(&mut stage, ParseStage::Done);

        let report = ParseReport {
            column: column.to_string(),
            total_rows: tokens.len(),
            null_rows: tokens.null_count(),
            assignment,
            statistics,
        };
        info!(
            "Parsed column '{}': {} rows ({} null) in {:?}",
            column,
            report.total_rows,
            report.null_rows,
            start_time.elapsed()
        );

        Ok((output, report))
    }

    fn resolve_rows(
        &self,
        values: &StringChunked,
        tokens: &TokenizedColumn,
        assignment: &FieldAssignment,
    ) -> Result<Vec<Option<StructuredRow>>> {
        let resolver = CenturyResolver::new(self.config.resolved_reference_year());
        let time_parser = match self.config.mode {
            ParseMode::Date => None,
            ParseMode::DateTime => Some(TimeParser::new(&self.config.time_separator)?),
        };
        debug!(
            "Resolving rows with reference year {:02}",
            resolver.reference_year()
        );

        tokens
            .rows
            .iter()
            .enumerate()
            .map(|(row, tokens)| {
                tokens
                    .as_ref()
                    .map(|tokens| {
                        let raw = values.get(row).unwrap_or_default();
                        resolve_row(
                            row,
                            raw,
                            tokens,
                            assignment,
                            &resolver,
                            time_parser.as_ref(),
                        )
                    })
                    .transpose()
            })
            .collect()
    }
}

fn resolve_row(
    row: usize,
    raw: &str,
    tokens: &RowTokens,
    assignment: &FieldAssignment,
    resolver: &CenturyResolver,
    time_parser: Option<&TimeParser>,
) -> Result<StructuredRow> {
    let component = |position: usize| -> Result<u32> {
        let token = &tokens.date[position];
        token.parse::<u32>().map_err(|_| {
            ExcellaintError::malformed_row(
                row,
                raw,
                format!("token '{}' at position {} is out of range", token, position),
            )
        })
    };

    let year = resolver.resolve(row, &tokens.date[assignment.year])?;
    let month = component(assignment.month)?;
    let day = component(assignment.day)?;

    let time = match time_parser {
        Some(parser) => {
            let token = tokens.time.as_deref().ok_or_else(|| {
                ExcellaintError::malformed_row(row, raw, "missing time token")
            })?;
            Some(parser.parse(row, token)?)
        }
        None => None,
    };

    Ok(StructuredRow {
        year,
        month,
        day,
        time,
    })
}

fn advance(stage: &mut ParseStage, next: ParseStage) {
    debug!("Parse stage: {:?} -> {:?}", stage, next);
    *stage = next;
}

/// Parse a column with a one-off parser built from `config`
pub fn parse_column(
    df: &DataFrame,
    column: &str,
    check_sorted: bool,
    config: &ParserConfig,
) -> Result<DataFrame> {
    DateParser::new(config.clone())?.parse(df, column, check_sorted)
}
