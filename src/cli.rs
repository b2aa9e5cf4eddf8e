//! Command-line interface components.

pub mod commands;

use crate::config::{ParseMode, ParserConfig};
use crate::constants::OUTPUT_FILE_SUFFIX;
use crate::error::Result;
use crate::table_io::{output_path_for, OutputFormat};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "excellaint")]
#[command(about = "Recover typed date and datetime columns from spreadsheet-mangled CSV exports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Input CSV files, directories, or glob patterns
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<String>,

    /// Name of the column holding the date strings
    #[arg(short, long)]
    pub column: String,

    /// Parse mode (date, datetime)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Separator between date tokens
    #[arg(long)]
    pub date_sep: Option<String>,

    /// Separator between hour and minute
    #[arg(long)]
    pub time_sep: Option<String>,

    /// Separator between the date part and the time part
    #[arg(long)]
    pub datetime_sep: Option<String>,

    /// Treat dates as American (month before day, '/' separator)
    #[arg(long)]
    pub american: bool,

    /// Allow the month to come before the day
    #[arg(long)]
    pub month_first: bool,

    /// Two-digit year used as the century cutoff (defaults to the current year)
    #[arg(long)]
    pub reference_year: Option<u32>,

    /// Render the parsed column back to text with this strftime format
    #[arg(long)]
    pub render_format: Option<String>,

    /// Output directory (defaults to each input's directory)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format (csv, parquet)
    #[arg(short, long, default_value = "csv")]
    pub format: String,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of files processed concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Check that the column is sorted before parsing (not implemented yet)
    #[arg(long)]
    pub check_sorted: bool,

    /// Show what would be processed without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by --verbose / --quiet
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format.parse()
    }

    /// Number of concurrent jobs, defaulting to the number of CPUs
    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Apply CLI overrides on top of a base configuration
    pub fn apply_overrides(&self, mut config: ParserConfig) -> Result<ParserConfig> {
        config.verbose_config = config.verbose_config || self.verbose;

        if let Some(mode) = &self.mode {
            config.set_mode(mode.parse::<ParseMode>()?);
        }
        if let Some(separator) = &self.date_sep {
            config.date_separator = separator.clone();
        }
        if let Some(separator) = &self.time_sep {
            config.time_separator = separator.clone();
        }
        if let Some(separator) = &self.datetime_sep {
            config.datetime_separator = separator.clone();
        }
        if self.month_first {
            config.allow_month_first = true;
        }
        if self.american {
            config.set_american_format(true);
        }
        if let Some(year) = self.reference_year {
            config.reference_year = Some(year);
        }
        if let Some(format) = &self.render_format {
            config.set_intended_format(format.clone())?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Output path for one input file
    pub fn output_path(&self, input: &Path) -> Result<PathBuf> {
        Ok(output_path_for(
            input,
            self.output_dir.as_deref(),
            OUTPUT_FILE_SUFFIX,
            self.output_format()?,
        ))
    }
}

/// Input discovery from paths, directories and glob patterns
pub mod input_discovery {
    use crate::constants::INPUT_FILE_EXTENSION;
    use anyhow::{Context, Result};
    use std::path::{Path, PathBuf};
    use walkdir::WalkDir;

    /// Expand CLI inputs into a sorted, de-duplicated list of files
    pub fn discover_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            let path = Path::new(input);
            if path.is_dir() {
                files.extend(walk_directory(path)?);
            } else if path.is_file() {
                files.push(path.to_path_buf());
            } else {
                let matches = glob::glob(input)
                    .with_context(|| format!("Invalid input pattern: {}", input))?;
                let before = files.len();
                for entry in matches {
                    let entry = entry.context("Failed to read glob match")?;
                    if entry.is_file() {
                        files.push(entry);
                    }
                }
                if files.len() == before {
                    anyhow::bail!("No input files match '{}'", input);
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn walk_directory(directory: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(directory) {
            let entry = entry.context("Failed to walk directory")?;
            if entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_FILE_EXTENSION))
            {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn test_discover_directory_and_glob() {
            let temp_dir = TempDir::new().unwrap();
            let nested = temp_dir.path().join("nested");
            std::fs::create_dir_all(&nested).unwrap();
            std::fs::write(temp_dir.path().join("a.csv"), "date\n").unwrap();
            std::fs::write(nested.join("b.CSV"), "date\n").unwrap();
            std::fs::write(nested.join("notes.txt"), "ignore me").unwrap();

            let from_dir =
                discover_inputs(&[temp_dir.path().to_string_lossy().to_string()]).unwrap();
            assert_eq!(from_dir.len(), 2);

            let pattern = temp_dir.path().join("*.csv").to_string_lossy().to_string();
            let from_glob = discover_inputs(&[pattern.clone(), pattern]).unwrap();
            assert_eq!(from_glob, vec![temp_dir.path().join("a.csv")]);
        }

        #[test]
        fn test_unmatched_pattern_fails() {
            let temp_dir = TempDir::new().unwrap();
            let pattern = temp_dir.path().join("*.csv").to_string_lossy().to_string();
            assert!(discover_inputs(&[pattern]).is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["excellaint", "input.csv", "--column", "date"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.column, "date");
        assert_eq!(args.output_format().unwrap(), OutputFormat::Csv);
        assert_eq!(args.get_log_level(), "info");
        assert!(args.jobs() >= 1);
    }

    #[test]
    fn test_overrides() {
        let args = args(&[
            "--mode",
            "datetime",
            "--date-sep",
            "-",
            "--time-sep",
            ".",
            "--reference-year",
            "30",
            "--render-format",
            "%d/%m/%Y %H:%M",
        ]);
        let config = args.apply_overrides(ParserConfig::default()).unwrap();
        assert_eq!(config.mode, ParseMode::DateTime);
        assert_eq!(config.date_separator, "-");
        assert_eq!(config.time_separator, ".");
        assert_eq!(config.reference_year, Some(30));
        assert!(config.hour);
        assert_eq!(config.intended_format.as_deref(), Some("%d/%m/%Y %H:%M"));
    }

    #[test]
    fn test_american_override() {
        let args = args(&["--american", "--date-sep", "-"]);
        let config = args.apply_overrides(ParserConfig::default()).unwrap();
        assert!(config.allow_month_first);
        assert!(!config.allow_day_first);
        assert_eq!(config.date_separator, "/");
    }

    #[test]
    fn test_invalid_overrides() {
        assert!(args(&["--mode", "time"])
            .apply_overrides(ParserConfig::default())
            .is_err());
        assert!(args(&["--reference-year", "2024"])
            .apply_overrides(ParserConfig::default())
            .is_err());
    }

    #[test]
    fn test_output_path() {
        let args = args(&["--format", "parquet", "--output-dir", "/tmp/out"]);
        assert_eq!(
            args.output_path(Path::new("/data/orders.csv")).unwrap(),
            PathBuf::from("/tmp/out/orders_parsed.parquet")
        );
    }
}
