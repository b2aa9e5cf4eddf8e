//! Time-of-day token parsing.
//!
//! Only `HH<sep>MM` is understood; seconds are always zero.

use crate::constants::{MAX_HOUR, MAX_MINUTE};
use crate::error::{ExcellaintError, Result};
use chrono::NaiveTime;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct TimeParser {
    pattern: Regex,
}

impl TimeParser {
    pub fn new(separator: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"^(\d{{1,2}}){}(\d{{1,2}})$", regex::escape(separator)))
            .map_err(|e| {
                ExcellaintError::configuration(format!(
                    "Invalid time separator {:?}: {}",
                    separator, e
                ))
            })?;
        Ok(Self { pattern })
    }

    pub fn parse(&self, row: usize, token: &str) -> Result<NaiveTime> {
        let captures = self.pattern.captures(token).ok_or_else(|| {
            ExcellaintError::invalid_time(row, token, "expected two numeric fields (hour, minute)")
        })?;

        let hour: u32 = captures[1]
            .parse()
            .map_err(|_| ExcellaintError::invalid_time(row, token, "hour is not a number"))?;
        let minute: u32 = captures[2]
            .parse()
            .map_err(|_| ExcellaintError::invalid_time(row, token, "minute is not a number"))?;

        if hour > MAX_HOUR {
            return Err(ExcellaintError::invalid_time(
                row,
                token,
                format!("hour {} is outside 0-{}", hour, MAX_HOUR),
            ));
        }
        if minute > MAX_MINUTE {
            return Err(ExcellaintError::invalid_time(
                row,
                token,
                format!("minute {} is outside 0-{}", minute, MAX_MINUTE),
            ));
        }

        NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| ExcellaintError::invalid_time(row, token, "not a valid time of day"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_hour_minute() {
        let parser = TimeParser::new(":").unwrap();
        let time = parser.parse(0, "13:45").unwrap();
        assert_eq!(time.hour(), 13);
        assert_eq!(time.minute(), 45);
        assert_eq!(time.second(), 0);

        assert_eq!(parser.parse(0, "7:05").unwrap().hour(), 7);
        assert_eq!(
            parser.parse(0, "00:00").unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_custom_separator_is_literal() {
        let parser = TimeParser::new(".").unwrap();
        assert_eq!(parser.parse(0, "09.30").unwrap().minute(), 30);
        assert!(parser.parse(0, "09x30").is_err());
    }

    #[test]
    fn test_out_of_range() {
        let parser = TimeParser::new(":").unwrap();
        assert!(matches!(
            parser.parse(2, "24:00"),
            Err(ExcellaintError::InvalidTimeToken { row: 2, .. })
        ));
        assert!(matches!(
            parser.parse(2, "23:60"),
            Err(ExcellaintError::InvalidTimeToken { .. })
        ));
    }

    #[test]
    fn test_wrong_shape() {
        let parser = TimeParser::new(":").unwrap();
        for token in ["1345", "13:45:00", "ab:cd", ":45", "130:45"] {
            assert!(
                matches!(parser.parse(0, token), Err(ExcellaintError::InvalidTimeToken { .. })),
                "token {:?} should be rejected",
                token
            );
        }
    }
}
