//! Error handling for date column parsing.
//!
//! Every failure aborts the whole parse call. Row-scoped variants carry the
//! zero-based row index so the caller can fix the input and retry.

use crate::models::Field;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExcellaintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Column '{column}' not found. Available columns: {available}")]
    ColumnNotFound { column: String, available: String },

    #[error("Column '{column}' has type {dtype}; only string columns can be parsed")]
    UnsupportedInputType { column: String, dtype: String },

    #[error("Malformed value at row {row}: '{value}' - {reason}")]
    MalformedRow {
        row: usize,
        value: String,
        reason: String,
    },

    #[error("Non-numeric date token at row {row}, position {position}: '{token}'")]
    NonNumericToken {
        row: usize,
        position: usize,
        token: String,
    },

    #[error("Could not assign all date fields. Unresolved: {}", join_fields(.unresolved))]
    AmbiguousFieldAssignment { unresolved: Vec<Field> },

    #[error("Unsupported configuration: {message}")]
    UnsupportedConfiguration { message: String },

    #[error("Invalid year token at row {row}: '{token}' (expected 2 or 4 characters)")]
    InvalidYearToken { row: usize, token: String },

    #[error("Invalid time token at row {row}: '{token}' - {reason}")]
    InvalidTimeToken {
        row: usize,
        token: String,
        reason: String,
    },

    #[error("Not implemented: {feature}")]
    NotImplemented { feature: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ExcellaintError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a malformed row error
    pub fn malformed_row(row: usize, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid time token error
    pub fn invalid_time(row: usize, token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimeToken {
            row,
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Row index for row-scoped failures
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::MalformedRow { row, .. }
            | Self::NonNumericToken { row, .. }
            | Self::InvalidYearToken { row, .. }
            | Self::InvalidTimeToken { row, .. } => Some(*row),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExcellaintError>;
