//! Command line interface.

pub mod command;

use std::{path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::parse_batch_size, source::gbif::EUROTIALES_TAXON_KEY};

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch GBIF occurrences and load them into the table store
    Gbif {
        /// Continent to search
        #[arg(long, default_value = "europe")]
        continent: String,
        /// GBIF taxon key (default: Eurotiales)
        #[arg(long, default_value_t = EUROTIALES_TAXON_KEY)]
        taxon_key: u64,
        /// Number of occurrences to request
        #[arg(long, default_value_t = 100)]
        limit: usize,
        /// Offset of the first occurrence
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Filter a HAEDAT spreadsheet export to events with valid coordinates
    Haedat {
        /// HAEDAT spreadsheet (`.xlsx`) or a CSV export of it
        #[arg(default_value = "haedat_geocoded.xlsx")]
        input: PathBuf,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Read a few rows back from the table store
    Verify {
        /// Table to read
        #[arg(long, default_value = "gbif_fungal_observations")]
        table: String,
        /// Number of rows to read
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

/// Where validated records go.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Table in the REST store to insert into
    #[arg(long)]
    pub table: Option<String>,
    /// Write to a `.csv` or `.parquet` file instead of the table store
    #[arg(long, conflicts_with = "table")]
    pub output: Option<PathBuf>,
    /// Records per insert (overrides OCCLOAD_BATCH_SIZE)
    #[arg(long, value_parser = parse_batch_size)]
    pub batch_size: Option<usize>,
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    let style = ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

    ProgressBar::new(size).with_message(message).with_style(style)
}

// -- Tests -------------------------------------------------------------------
