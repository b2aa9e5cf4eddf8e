//! Configuration management and validation.
//!
//! A [`ParserConfig`] is built once per parsing session, validated, and
//! then handed to the parser by value. The parser keeps its own copy, so a
//! parse call always sees a consistent snapshot.

use crate::constants::{
    AMERICAN_DATE_SEPARATOR, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATE_SEPARATOR,
    DEFAULT_DATETIME_SEPARATOR, DEFAULT_TIME_SEPARATOR, REFERENCE_YEAR_LIMIT,
};
use crate::error::{ExcellaintError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Whether values carry a time component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    #[default]
    Date,
    DateTime,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Date => "date",
            ParseMode::DateTime => "datetime",
        }
    }
}

impl FromStr for ParseMode {
    type Err = ExcellaintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(ParseMode::Date),
            "datetime" => Ok(ParseMode::DateTime),
            other => Err(ExcellaintError::configuration(format!(
                "mode must be one of 'date' or 'datetime', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings read by every pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Date or datetime parsing
    pub mode: ParseMode,

    /// Date fields are always included
    pub year: bool,
    pub month: bool,
    pub day: bool,

    /// Time fields, forced off in date mode
    pub hour: bool,
    pub minute: bool,
    pub second: bool,

    /// Separator between date tokens
    pub date_separator: String,

    /// Separator between hour and minute
    pub time_separator: String,

    /// Separator between the date part and the time part
    pub datetime_separator: String,

    /// Month may precede day
    pub allow_month_first: bool,

    /// Day may precede month
    pub allow_day_first: bool,

    /// Year may lead the value
    pub allow_year_first: bool,

    /// Two-digit cutoff for century resolution (None = current year)
    pub reference_year: Option<u32>,

    /// strftime format used when rendering parsed values back to text
    pub intended_format: Option<String>,

    /// Log the assumptions made while configuring
    pub verbose_config: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::Date,
            year: true,
            month: true,
            day: true,
            hour: false,
            minute: false,
            second: false,
            date_separator: DEFAULT_DATE_SEPARATOR.to_string(),
            time_separator: DEFAULT_TIME_SEPARATOR.to_string(),
            datetime_separator: DEFAULT_DATETIME_SEPARATOR.to_string(),
            allow_month_first: false,
            allow_day_first: true,
            allow_year_first: true,
            reference_year: None,
            intended_format: None,
            verbose_config: false,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parse mode. Date mode switches the time fields off.
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.set_mode(mode);
        self
    }

    pub fn set_mode(&mut self, mode: ParseMode) {
        self.mode = mode;
        match mode {
            ParseMode::Date => self.disable_time_fields(),
            ParseMode::DateTime => {
                self.hour = true;
                self.minute = true;
                self.second = true;
            }
        }
    }

    /// Request time fields. Ignored in date mode.
    pub fn with_time_fields(mut self, hour: bool, minute: bool, second: bool) -> Self {
        if self.mode == ParseMode::DateTime {
            self.hour = hour;
            self.minute = minute;
            self.second = second;
        } else {
            if self.verbose_config && (hour || minute || second) {
                warn!("Mode is set to 'date'. Disabling hour, minute, and second options.");
            }
            self.disable_time_fields();
        }
        self
    }

    fn disable_time_fields(&mut self) {
        if self.verbose_config && (self.hour || self.minute || self.second) {
            warn!("Mode is set to 'date'. Disabling hour, minute, and second options.");
        }
        self.hour = false;
        self.minute = false;
        self.second = false;
    }

    pub fn with_date_separator(mut self, separator: impl Into<String>) -> Self {
        self.date_separator = separator.into();
        self
    }

    pub fn with_time_separator(mut self, separator: impl Into<String>) -> Self {
        self.time_separator = separator.into();
        self
    }

    pub fn with_datetime_separator(mut self, separator: impl Into<String>) -> Self {
        self.datetime_separator = separator.into();
        self
    }

    pub fn with_month_first(mut self, allowed: bool) -> Self {
        self.allow_month_first = allowed;
        self
    }

    pub fn with_day_first(mut self, allowed: bool) -> Self {
        self.allow_day_first = allowed;
        self
    }

    pub fn with_year_first(mut self, allowed: bool) -> Self {
        self.allow_year_first = allowed;
        self
    }

    /// Pin the two-digit reference year used for century resolution
    pub fn with_reference_year(mut self, two_digit_year: u32) -> Self {
        self.reference_year = Some(two_digit_year);
        self
    }

    pub fn with_verbose_config(mut self, verbose: bool) -> Self {
        self.verbose_config = verbose;
        self
    }

    /// American dates always put the month before the day and use `/`.
    pub fn set_american_format(&mut self, allowed: bool) {
        self.allow_month_first = allowed;
        self.allow_day_first = !allowed;
        self.date_separator = AMERICAN_DATE_SEPARATOR.to_string();
    }

    pub fn with_american_format(mut self, allowed: bool) -> Self {
        self.set_american_format(allowed);
        self
    }

    /// Set the format used to render parsed values, rejecting invalid strftime strings
    pub fn set_intended_format(&mut self, format: impl Into<String>) -> Result<()> {
        let format = format.into();
        validate_strftime(&format)?;
        self.intended_format = Some(format);
        Ok(())
    }

    pub fn with_intended_format(mut self, format: impl Into<String>) -> Result<Self> {
        self.set_intended_format(format)?;
        Ok(self)
    }

    /// Two-digit reference year, falling back to the current local year
    pub fn resolved_reference_year(&self) -> u32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year().rem_euclid(100) as u32)
    }

    /// Check option values before a parse call
    pub fn validate(&self) -> Result<()> {
        if self.date_separator.is_empty() {
            return Err(ExcellaintError::configuration(
                "date_separator must not be empty",
            ));
        }
        if self.mode == ParseMode::DateTime {
            if self.time_separator.is_empty() {
                return Err(ExcellaintError::configuration(
                    "time_separator must not be empty",
                ));
            }
            if self.datetime_separator.is_empty() {
                return Err(ExcellaintError::configuration(
                    "datetime_separator must not be empty",
                ));
            }
        }
        if self.mode == ParseMode::Date && (self.hour || self.minute || self.second) {
            return Err(ExcellaintError::configuration(
                "hour, minute and second must be disabled in date mode",
            ));
        }
        if !(self.year && self.month && self.day) {
            return Err(ExcellaintError::configuration(
                "year, month and day fields cannot be disabled",
            ));
        }
        if let Some(year) = self.reference_year {
            if year >= REFERENCE_YEAR_LIMIT {
                return Err(ExcellaintError::configuration(format!(
                    "reference_year must be a two-digit year (0-99), got {}",
                    year
                )));
            }
        }
        if let Some(format) = &self.intended_format {
            validate_strftime(format)?;
        }
        Ok(())
    }

    /// Default config file location (`<config dir>/excellaint/config.json`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ExcellaintError::configuration("Could not determine user config directory")
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let raw: serde_json::Value = serde_json::from_str(&contents)?;
        let mut config: ParserConfig = serde_json::from_value(raw.clone())?;

        // Time flags follow the mode; datetime files may still switch single fields off
        let requested = |key: &str| raw.get(key).and_then(serde_json::Value::as_bool);
        let (hour, minute, second) = (requested("hour"), requested("minute"), requested("second"));
        config.set_mode(config.mode);
        if config.mode == ParseMode::DateTime {
            config.hour = hour.unwrap_or(true);
            config.minute = minute.unwrap_or(true);
            config.second = second.unwrap_or(true);
        }
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults, then an explicit or default-location config file if present
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        match config_file {
            Some(path) => Self::from_json_file(path),
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => Self::from_json_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

fn validate_strftime(format: &str) -> Result<()> {
    if format.is_empty() {
        return Err(ExcellaintError::configuration("Format string must not be empty"));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ExcellaintError::configuration(format!(
            "Invalid format string: '{}'",
            format
        )));
    }
    Ok(())
}

impl fmt::Display for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ExcellAint Configuration:")?;
        writeln!(f, "    mode: {}", self.mode)?;
        writeln!(
            f,
            "    fields: year={} month={} day={} hour={} minute={} second={}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )?;
        writeln!(f, "    date_separator: {:?}", self.date_separator)?;
        writeln!(f, "    time_separator: {:?}", self.time_separator)?;
        writeln!(f, "    datetime_separator: {:?}", self.datetime_separator)?;
        writeln!(f, "    allow_month_first: {}", self.allow_month_first)?;
        writeln!(f, "    allow_day_first: {}", self.allow_day_first)?;
        writeln!(f, "    allow_year_first: {}", self.allow_year_first)?;
        match self.reference_year {
            Some(year) => writeln!(f, "    reference_year: {:02}", year)?,
            None => writeln!(f, "    reference_year: current")?,
        }
        write!(
            f,
            "    intended_format: {}",
            self.intended_format.as_deref().unwrap_or("none")
        )
    }
}
