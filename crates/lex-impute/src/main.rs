//! CLI entry point for the missing-value imputation tool.

use anyhow::Result;
use clap::Parser;
use lex_impute::{CleaningPipeline, ColumnMissingProfile, ImputeError, RunConfig};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{debug, error};

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Configuration-driven missing value imputation",
    long_about = "Fills or removes missing values in a CSV dataset, one strategy per column.\n\n\
                  Strategies are read from an INI file with one section per column:\n\n  \
                  [Price]\n  \
                  strategy = cubic\n\n\
                  STRATEGIES:\n  \
                  mean, median, mode, zero, remove, ffill, bfill,\n  \
                  nearest, linear, slinear, quadratic, cubic\n\n\
                  EXAMPLES:\n  \
                  # Clean data/data.csv using parameter_config.ini\n  \
                  lex-impute\n\n  \
                  # Explicit paths\n  \
                  lex-impute -i prices.csv -c strategies.ini -o cleaned.csv\n\n  \
                  # Show missing values per column without cleaning\n  \
                  lex-impute -i prices.csv --inspect"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long, default_value = "data/data.csv")]
    input: PathBuf,

    /// Strategy configuration file
    #[arg(short, long, default_value = "parameter_config.ini")]
    config: PathBuf,

    /// Where the cleaned CSV is written
    #[arg(short, long, default_value = "data/cleaned_data.csv")]
    output: PathBuf,

    /// Log file, truncated at the start of every run
    #[arg(long, default_value = "data_cleaning.log")]
    log_file: PathBuf,

    /// Comma-separated columns to parse as dates
    #[arg(long, value_delimiter = ',', default_value = "Date")]
    parse_dates: Vec<String>,

    /// Do not parse any column as dates
    #[arg(long, conflicts_with = "parse_dates")]
    no_parse_dates: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Print missing values per column and exit without cleaning
    #[arg(long)]
    inspect: bool,

    /// Print the result as JSON instead of a human-readable message
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber, writing to `log_file`.
///
/// `RUST_LOG` takes precedence over `level` when set.
fn init_logging(log_file: &Path, level: &str) -> std::io::Result<()> {
    use tracing_subscriber::EnvFilter;

    let file = File::create(log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file, &args.log_level) {
        eprintln!(
            "etl task failed!!! (cannot open log file {}: {})",
            args.log_file.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let (code, exit_code) = match e.downcast_ref::<ImputeError>() {
                Some(err) => (err.error_code(), err.exit_code()),
                None => ("INTERNAL", 1),
            };
            eprintln!(
                "etl task failed!!! ({}, see {})",
                code,
                args.log_file.display()
            );
            ExitCode::from(exit_code)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let date_columns = if args.no_parse_dates {
        Vec::new()
    } else {
        args.parse_dates.clone()
    };

    let config = RunConfig::builder()
        .input_path(&args.input)
        .strategy_path(&args.config)
        .output_path(&args.output)
        .date_columns(date_columns)
        .build()
        .inspect_err(|e| error!("Invalid run configuration: {}", e))
        .map_err(ImputeError::from)?;
    debug!("Run configuration: {:?}", config);

    let pipeline = CleaningPipeline::new(config);

    if args.inspect {
        let profile = pipeline.inspect()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        } else {
            print_profile(&args.input, &profile);
        }
        return Ok(());
    }

    let summary = pipeline.run()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Data cleaning process completed successfully!");
    }
    Ok(())
}

/// Print the missing-value table for `--inspect`.
///
/// Uses `println!` since this is the command's output, not a log line.
fn print_profile(input: &Path, profile: &[ColumnMissingProfile]) {
    println!("MISSING VALUES: {}", input.display());
    println!("{}", "-".repeat(60));
    println!(
        "{:<24} {:<16} {:>8} {:>9}",
        "Column", "Type", "Missing", "Missing %"
    );
    println!("{}", "-".repeat(60));
    for column in profile {
        println!(
            "{:<24} {:<16} {:>8} {:>9.1}",
            truncate_str(&column.name, 23),
            truncate_str(&column.dtype, 15),
            column.missing_count,
            column.missing_percentage
        );
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
