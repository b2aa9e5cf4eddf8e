//! Two-digit year resolution.

use crate::constants::{CURRENT_CENTURY, FULL_YEAR_WIDTH, PREVIOUS_CENTURY, SHORT_YEAR_WIDTH};
use crate::error::{ExcellaintError, Result};

/// Expands year tokens to four-digit years around a two-digit reference year.
///
/// Two-digit years at or below the reference land in the 2000s, the rest in
/// the 1900s. Dates a century or more in the past resolve wrongly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenturyResolver {
    reference_year: u32,
}

impl CenturyResolver {
    pub fn new(reference_year: u32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> u32 {
        self.reference_year
    }

    pub fn resolve(&self, row: usize, token: &str) -> Result<i32> {
        let invalid = || ExcellaintError::InvalidYearToken {
            row,
            token: token.to_string(),
        };

        match token.chars().count() {
            FULL_YEAR_WIDTH => token.parse::<i32>().map_err(|_| invalid()),
            SHORT_YEAR_WIDTH => {
                let short = token.parse::<u32>().map_err(|_| invalid())?;
                let century = if short <= self.reference_year {
                    CURRENT_CENTURY
                } else {
                    PREVIOUS_CENTURY
                };
                Ok(century + short as i32)
            }
            _ => Err(invalid()),
        }
    }
}
