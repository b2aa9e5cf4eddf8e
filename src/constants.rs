//! Application constants for excellaint
//!
//! Default separators, token shape rules, and output settings used
//! throughout the parsing pipeline and the CLI.

// =============================================================================
// Separators
// =============================================================================

/// Default separator between date tokens
pub const DEFAULT_DATE_SEPARATOR: &str = "/";

/// Default separator between hour and minute
pub const DEFAULT_TIME_SEPARATOR: &str = ":";

/// Default separator between the date part and the time part
pub const DEFAULT_DATETIME_SEPARATOR: &str = " ";

/// Separator forced by the American format toggle
pub const AMERICAN_DATE_SEPARATOR: &str = "/";

// =============================================================================
// Token Shape
// =============================================================================

/// Number of date tokens every row must split into
pub const DATE_TOKEN_COUNT: usize = 3;

/// Number of parts a datetime value splits into (date, time)
pub const DATETIME_PART_COUNT: usize = 2;

/// Number of subtokens in a time token (hour, minute)
pub const TIME_TOKEN_COUNT: usize = 2;

/// Character width that marks a token position as the year
pub const FULL_YEAR_WIDTH: usize = 4;

/// Character width of an abbreviated year
pub const SHORT_YEAR_WIDTH: usize = 2;

/// Century prefix for two-digit years at or below the reference year
pub const CURRENT_CENTURY: i32 = 2000;

/// Century prefix for two-digit years above the reference year
pub const PREVIOUS_CENTURY: i32 = 1900;

/// Exclusive upper bound of a two-digit reference year
pub const REFERENCE_YEAR_LIMIT: u32 = 100;

// =============================================================================
// Time Conversion
// =============================================================================

pub const MAX_HOUR: u32 = 23;
pub const MAX_MINUTE: u32 = 59;

pub const MILLIS_PER_MINUTE: i64 = 60 * 1000;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Days between 0001-01-01 (CE day 1) and 1970-01-01
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days between 0000-03-01 and 1970-01-01 in the proleptic Gregorian calendar
pub const CIVIL_ORIGIN_TO_UNIX_EPOCH_DAYS: i64 = 719_468;

// =============================================================================
// Output Settings
// =============================================================================

/// Default render format for date columns
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default render format for datetime columns
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Suffix appended to output file stems
pub const OUTPUT_FILE_SUFFIX: &str = "_parsed";

/// Config file name inside the user config directory
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Application directory name inside the user config directory
pub const CONFIG_DIR_NAME: &str = "excellaint";

/// Input file extension picked up when walking directories
pub const INPUT_FILE_EXTENSION: &str = "csv";
