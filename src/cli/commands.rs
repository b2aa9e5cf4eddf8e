//! Command implementations for the excellaint CLI
//!
//! Discovers input files, parses the requested column of each one on the
//! blocking pool and reports a summary once every file has been attempted.

use crate::cli::Args;
use crate::cli::input_discovery::discover_inputs;
use crate::config::ParserConfig;
use crate::models::ParseReport;
use crate::parser::{render_column, DateParser};
use crate::table_io::{read_csv, write_table, OutputFormat};
use anyhow::{Context, Result};
use colored::Colorize;
use futures::stream::{self, StreamExt};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Statistics for one CLI run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub files_discovered: usize,
    pub files_parsed: usize,
    pub files_failed: usize,
    pub rows_parsed: usize,
    pub null_rows: usize,
    pub processing_time: Duration,
    /// Output paths with their sizes in bytes
    pub outputs: Vec<(PathBuf, u64)>,
    /// Inputs that failed, with the error message
    pub failures: Vec<(PathBuf, String)>,
}

impl RunStats {
    pub fn total_output_size(&self) -> u64 {
        self.outputs.iter().map(|(_, size)| size).sum()
    }

    /// Format a byte count in human-readable units
    pub fn format_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    fn record(&mut self, input: PathBuf, result: Result<FileOutcome>) {
        match result {
            Ok(outcome) => {
                self.files_parsed += 1;
                self.rows_parsed += outcome.report.parsed_rows();
                self.null_rows += outcome.report.null_rows;
                self.outputs.push((outcome.output, outcome.output_size));
            }
            Err(e) => {
                error!("Failed to process {}: {:#}", input.display(), e);
                self.files_failed += 1;
                self.failures.push((input, format!("{:#}", e)));
            }
        }
    }
}

/// Result of parsing a single file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub output: PathBuf,
    pub output_size: u64,
    pub report: ParseReport,
}

/// Main command runner
///
/// 1. Set up logging and load the layered configuration
/// 2. Expand inputs into CSV files
/// 3. Parse files concurrently with progress reporting
/// 4. Print a summary
///
/// A file that fails to parse is reported and does not stop the others.
pub async fn run(args: Args) -> Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(&args)?;
    info!("Starting excellaint");
    debug!("Command line arguments: {:?}", args);

    let config = load_configuration(&args)?;
    let format = args.output_format()?;

    let inputs = discover_inputs(&args.inputs)?;
    info!("Discovered {} input files", inputs.len());

    if args.dry_run {
        return run_dry_run(&args, &inputs);
    }

    let parser = Arc::new(DateParser::new(config)?);
    let mut stats = RunStats {
        files_discovered: inputs.len(),
        ..Default::default()
    };

    let progress_bar = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        pb.set_message("Parsing...");
        Some(pb)
    };

    let jobs = args.jobs();
    debug!("Processing with {} concurrent jobs", jobs);

    let mut results = stream::iter(inputs.into_iter().map(|input| {
        let parser = Arc::clone(&parser);
        let column = args.column.clone();
        let check_sorted = args.check_sorted;
        let output = args.output_path(&input);
        async move {
            let output = match output {
                Ok(output) => output,
                Err(e) => return (input, Err(anyhow::Error::from(e))),
            };
            let task_input = input.clone();
            let result = tokio::task::spawn_blocking(move || {
                process_file(&task_input, &output, &column, check_sorted, &parser, format)
            })
            .await
            .context("File processing task panicked")
            .and_then(|result| result);
            (input, result)
        }
    }))
    .buffer_unordered(jobs);

    while let Some((input, result)) = results.next().await {
        if let Some(pb) = &progress_bar {
            pb.inc(1);
            pb.set_message(format!("{}", input.display()));
        }
        stats.record(input, result);
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Parsing complete");
    }

    stats.processing_time = start_time.elapsed();
    if !args.quiet {
        print_summary(&stats);
    }

    Ok(stats)
}

/// Parse one file and write the result next to it (or into the output dir)
pub fn process_file(
    input: &Path,
    output: &Path,
    column: &str,
    check_sorted: bool,
    parser: &DateParser,
    format: OutputFormat,
) -> Result<FileOutcome> {
    debug!("Processing {}", input.display());

    let df = read_csv(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let (parsed, report) = parser
        .parse_with_report(&df, column, check_sorted)
        .with_context(|| format!("Failed to parse column '{}' in {}", column, input.display()))?;

    if let Some(assignment) = &report.assignment {
        info!("{}: {}", input.display(), assignment);
    }

    let mut parsed = match parser.config().intended_format.as_deref() {
        Some(render_format) => render_column(&parsed, column, Some(render_format))?,
        None => parsed,
    };

    write_table(&mut parsed, output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    let output_size = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);

    Ok(FileOutcome {
        output: output.to_path_buf(),
        output_size,
        report,
    })
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("excellaint={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration (defaults -> config file -> CLI flags)
fn load_configuration(args: &Args) -> Result<ParserConfig> {
    match &args.config {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, checking the default location"),
    }

    let base = ParserConfig::load_layered(args.config.as_deref())
        .context("Failed to load configuration")?;
    let config = args.apply_overrides(base)?;

    if config.allow_month_first {
        warn!("Month-first dates are enabled; classification will fail until they are supported");
    }
    Ok(config)
}

/// Show what would be processed without reading or writing anything
fn run_dry_run(args: &Args, inputs: &[PathBuf]) -> Result<RunStats> {
    info!("Performing dry run - no files will be created");

    for input in inputs {
        info!(
            "Would parse column '{}' of {} into {}",
            args.column,
            input.display(),
            args.output_path(input)?.display()
        );
    }

    info!("Dry run complete: {} files would be processed", inputs.len());
    Ok(RunStats {
        files_discovered: inputs.len(),
        ..Default::default()
    })
}

fn print_summary(stats: &RunStats) {
    println!();
    println!("{}", "excellaint run complete".bold());
    println!("  Files parsed:     {}", stats.files_parsed.to_string().green());
    println!("  Rows parsed:      {}", stats.rows_parsed);
    println!("  Null rows:        {}", stats.null_rows);
    println!(
        "  Output size:      {}",
        RunStats::format_size(stats.total_output_size())
    );
    println!("  Processing time:  {}", HumanDuration(stats.processing_time));

    if stats.files_failed > 0 {
        println!("  Files failed:     {}", stats.files_failed.to_string().red());
        for (input, message) in &stats.failures {
            println!("    {} {}: {}", "x".red(), input.display(), message);
        }
    }

    if !stats.outputs.is_empty() {
        println!();
        println!("{}", "Output files:".bold());
        for (path, size) in &stats.outputs {
            println!("  {} ({})", path.display(), RunStats::format_size(*size));
        }
    }
    println!();
}
