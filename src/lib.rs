//! ExcellAint Library
//!
//! A Rust library for recovering strongly-typed date and datetime columns
//! from text that spreadsheets have mangled ("03/04/05", "15-01-2024 13:45").
//!
//! This library provides tools for:
//! - Splitting raw date strings into positional tokens
//! - Collecting per-position statistics across a whole column
//! - Inferring which token position holds the year, month and day
//! - Resolving two-digit years against a reference year
//! - Reassembling the pieces into polars `Date` / `Datetime` columns
//! - Reading and writing CSV and Parquet tables from the command line

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod table_io;

// Re-export commonly used types
pub use config::{ParseMode, ParserConfig};
pub use error::{ExcellaintError, Result};
pub use models::{Field, FieldAssignment, ParseReport};
pub use parser::{parse_column, render_column, DateParser, FieldClassifier, YearWidthClassifier};
