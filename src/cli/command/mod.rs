pub mod gbif;
pub mod haedat;
pub mod verify;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local};
use tracing::info;

pub use gbif::gbif;
pub use haedat::haedat;
pub use verify::verify;

use crate::{
    cli::{create_progress_bar, TargetArgs},
    config::{LoaderConfig, StoreConfig},
    pipeline::{Pipeline, RunSummary},
    record::{RawRecord, Schema},
    store::{Destination, RestStore},
};

pub fn make_output_file_name(dataset: &str, extension: &str) -> Result<PathBuf> {
    let today = Local::now();
    let file_name = format!(
        "{}-{}-{:02}-{:02}.{}",
        dataset,
        today.year(),
        today.month(),
        today.day(),
        extension
    );

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not locate home directory"))?;

    Ok(home.join(file_name))
}

/// Opens the store the target arguments point at.
///
/// An explicit `--output` wins, then an explicit `--table`, then the
/// command's default (a table if it has one, else `default_file`).
pub fn open_destination(
    target: &TargetArgs,
    schema: &Schema,
    default_table: Option<&str>,
    default_file: impl FnOnce() -> Result<PathBuf>,
) -> Result<Destination> {
    if let Some(output) = &target.output {
        return Ok(Destination::file(output, schema)?);
    }

    match target.table.as_deref().or(default_table) {
        Some(table) => {
            let config = StoreConfig::from_env()?;
            Ok(Destination::Rest(RestStore::new(&config, table)))
        }
        None => Ok(Destination::file(&default_file()?, schema)?),
    }
}

/// Runs the pipeline with a progress bar over the batches.
pub async fn load_records(
    raw: &[RawRecord],
    schema: &Schema,
    destination: &mut Destination,
    target: &TargetArgs,
    config: &LoaderConfig,
) -> Result<RunSummary> {
    let batch_size = target.batch_size.unwrap_or(config.batch_size);
    info!(
        "Saving {} records to {} in batches of {}",
        raw.len(),
        destination.describe(),
        batch_size
    );

    let mut pipeline = Pipeline::new(schema, batch_size);
    let pb = create_progress_bar(0, "Inserting batches".to_string());

    let result = pipeline
        .run(raw, destination, |progress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.inserted as u64);
        })
        .await;

    match result {
        Ok(summary) => {
            pb.finish_with_message("Batches inserted");
            Ok(summary)
        }
        Err(e) => {
            pb.abandon_with_message(format!("Stopped while {}", pipeline.state()));
            Err(e.into())
        }
    }
}

pub fn describe_summary(summary: &RunSummary) -> String {
    format!(
        "Saved {} of {} records ({} dropped for invalid coordinates)",
        summary.inserted, summary.fetched, summary.rejected
    )
}

// -- Tests -------------------------------------------------------------------
