//! Core data structures for date column parsing.
//!
//! Defines the intermediate values each pipeline stage hands to the next:
//! tokenized rows, per-position column statistics, the field assignment,
//! and the structured rows that are collapsed into timestamps.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic date component a token position can be assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Year,
    Month,
    Day,
}

impl Field {
    /// All date fields, in the order they are reported
    pub const ALL: [Field; 3] = [Field::Year, Field::Month, Field::Day];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Year => "Year",
            Field::Month => "Month",
            Field::Day => "Day",
        };
        f.write_str(name)
    }
}

/// Tokens produced from one non-null raw value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowTokens {
    pub date: Vec<String>,
    pub time: Option<String>,
}

/// Tokenized column. `None` entries are null input rows.
#[derive(Debug, Clone, Default)]
pub struct TokenizedColumn {
    pub rows: Vec<Option<RowTokens>>,
}

impl TokenizedColumn {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of null rows
    pub fn null_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_none()).count()
    }
}

/// Width and value summary for one token position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStats {
    pub max_chars: usize,
    pub max_value: u64,
}

/// Per-position statistics for a whole column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTokenStats {
    pub positions: Vec<PositionStats>,
}

impl ColumnTokenStats {
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn get(&self, position: usize) -> Option<&PositionStats> {
        self.positions.get(position)
    }
}

/// Mapping from token position to date field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssignment {
    pub year: usize,
    pub month: usize,
    pub day: usize,
}

impl FieldAssignment {
    /// Field assigned to a token position
    pub fn field_at(&self, position: usize) -> Option<Field> {
        if position == self.year {
            Some(Field::Year)
        } else if position == self.month {
            Some(Field::Month)
        } else if position == self.day {
            Some(Field::Day)
        } else {
            None
        }
    }

    /// Token position holding a field
    pub fn position_of(&self, field: Field) -> usize {
        match field {
            Field::Year => self.year,
            Field::Month => self.month,
            Field::Day => self.day,
        }
    }

    /// Fields whose position is out of range or shared with another field
    pub fn invalid_fields(&self, position_count: usize) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| {
                let position = self.position_of(field);
                position >= position_count
                    || Field::ALL
                        .iter()
                        .any(|&other| other != field && self.position_of(other) == position)
            })
            .collect()
    }
}

impl fmt::Display for FieldAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year@{}, Month@{}, Day@{}",
            self.year, self.month, self.day
        )
    }
}

/// Fully resolved row, ready to be collapsed into a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredRow {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub time: Option<NaiveTime>,
}

/// Stages of one parse call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Start,
    Tokenized,
    StatisticsCollected,
    FieldsClassified,
    RowResolved,
    Reassembled,
    Done,
}

/// Summary of a completed parse call
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub column: String,
    pub total_rows: usize,
    pub null_rows: usize,
    pub assignment: Option<FieldAssignment>,
    pub statistics: ColumnTokenStats,
}

impl ParseReport {
    /// Rows that produced a timestamp
    pub fn parsed_rows(&self) -> usize {
        self.total_rows - self.null_rows
    }
}
