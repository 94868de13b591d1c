//! chiptools command line
//!
//! Cleans a CSV or JSON table: collapses rows that share a row-key and moves
//! constant-valued columns into a separate mapping.
//!
//! # Usage
//!
//! ```bash
//! # Clean a file and print the result as CSV
//! chiptools observations.csv
//!
//! # Write the table and the constant mapping to files
//! chiptools observations.csv --output cleaned.json --constants constants.json --label metadata
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use chiptools::config::CleanupConfig;
use chiptools::io::TableWriter;
use chiptools::parsing::csv_parser::table_to_csv;
use chiptools::preprocessing::CleanupPipeline;

#[derive(Parser)]
#[command(
    name = "chiptools",
    version,
    about = "Remove duplicate rows and constant columns from a table"
)]
struct Args {
    /// Input table (.csv or .json)
    input: PathBuf,
    /// Configuration file (defaults to chiptools.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the cleaned table here (.csv or .json) instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Write the constant mapping here as JSON
    #[arg(long)]
    constants: Option<PathBuf>,
    /// Relabel the cleaned table, keeping the old label in the mapping
    #[arg(short, long)]
    label: Option<String>,
    /// Duplicate keep strategy: first, last, none or most_complete
    #[arg(short, long)]
    keep: Option<String>,
    /// Do not count missing cells as a value when looking for constants
    #[arg(long)]
    ignore_missing: bool,
    /// Skip duplicate-row reduction
    #[arg(long)]
    no_reduce: bool,
    /// Skip constant-column extraction
    #[arg(long)]
    no_extract: bool,
}

fn load_config(args: &Args) -> anyhow::Result<CleanupConfig> {
    let mut config = match &args.config {
        Some(path) => CleanupConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => CleanupConfig::from_default_location().unwrap_or_else(|e| {
            debug!("Using default configuration: {}", e);
            CleanupConfig::default()
        }),
    };

    if let Some(label) = &args.label {
        config.cleanup.new_label = Some(label.clone());
    }
    if let Some(keep) = &args.keep {
        config.cleanup.keep = keep.clone();
    }
    if args.ignore_missing {
        config.cleanup.count_missing_as_value = false;
    }
    if args.no_reduce {
        config.cleanup.reduce_duplicates = false;
    }
    if args.no_extract {
        config.cleanup.extract_constants = false;
    }

    // Fail on a bad strategy before reading any data
    config.keep_strategy()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let csv_options = config.csv_options()?;

    info!("Cleaning {}", args.input.display());
    let outcome = CleanupPipeline::with_config(config).process(&args.input)?;

    for warning in &outcome.validation.warnings {
        info!("{}", warning);
    }

    match &args.output {
        Some(path) => {
            TableWriter::write_to_file(&outcome.table, path, &csv_options)?;
            info!("Wrote cleaned table to {}", path.display());
        }
        None => table_to_csv(&outcome.table, io::stdout().lock(), &csv_options)?,
    }

    match &args.constants {
        Some(path) => {
            TableWriter::write_constants(&outcome.constants, path)?;
            info!("Wrote {} constants to {}", outcome.constants.len(), path.display());
        }
        None => {
            for (name, value) in outcome.constants.iter() {
                info!("constant {} = {:?}", name, value);
            }
        }
    }

    Ok(())
}
