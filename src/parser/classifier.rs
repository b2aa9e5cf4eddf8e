//! Token position classification.
//!
//! A [`FieldClassifier`] turns column statistics into a [`FieldAssignment`].
//! Only one strategy exists today: the year is the first position whose
//! widest token is four characters, and the day sits just before it.

use crate::config::ParserConfig;
use crate::constants::FULL_YEAR_WIDTH;
use crate::error::{ExcellaintError, Result};
use crate::models::{ColumnTokenStats, Field, FieldAssignment};
use std::fmt::Debug;
use tracing::{debug, info};

/// Strategy mapping token positions to date fields
pub trait FieldClassifier: Debug + Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Assign Year, Month and Day to distinct token positions
    fn classify(&self, stats: &ColumnTokenStats, config: &ParserConfig)
        -> Result<FieldAssignment>;
}

/// Classifies by token width: a four-character position is the year.
///
/// Columns that only ever carry two-digit years cannot be classified and
/// fail with [`ExcellaintError::AmbiguousFieldAssignment`]. Numeric ranges
/// are not consulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct YearWidthClassifier;

impl FieldClassifier for YearWidthClassifier {
    fn name(&self) -> &'static str {
        "year-width"
    }

    fn classify(
        &self,
        stats: &ColumnTokenStats,
        config: &ParserConfig,
    ) -> Result<FieldAssignment> {
        let positions = stats.position_count();

        let Some(year) = stats
            .positions
            .iter()
            .position(|p| p.max_chars == FULL_YEAR_WIDTH)
        else {
            debug!("No token position is {} characters wide", FULL_YEAR_WIDTH);
            return Err(ExcellaintError::AmbiguousFieldAssignment {
                unresolved: Field::ALL.to_vec(),
            });
        };

        if config.allow_month_first {
            return Err(ExcellaintError::UnsupportedConfiguration {
                message: "month-first ordering with a four digit year is not supported yet"
                    .to_string(),
            });
        }

        let day = (year + positions - 1) % positions;
        let month = (0..positions).find(|&p| p != year && p != day);

        let mut unresolved = Vec::new();
        if day == year {
            unresolved.push(Field::Day);
        }
        if month.is_none() {
            unresolved.push(Field::Month);
        }

        match month {
            Some(month) if unresolved.is_empty() => {
                let assignment = FieldAssignment { year, month, day };
                info!("Classified token positions: {}", assignment);
                Ok(assignment)
            }
            _ => Err(ExcellaintError::AmbiguousFieldAssignment { unresolved }),
        }
    }
}
