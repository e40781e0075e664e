//! Filter the HAEDAT event spreadsheet down to its essential columns and valid coordinates.

use std::path::Path;

use anyhow::{Context, Result};

use super::{describe_summary, load_records, make_output_file_name, open_destination};
use crate::{
    cli::{create_spinner, TargetArgs},
    config::LoaderConfig,
    record::Schema,
    source::read_rows,
};

pub async fn haedat(input: &Path, target: &TargetArgs) -> Result<String> {
    let config = LoaderConfig::from_env()?;
    let schema = Schema::haedat_event();

    let bar = create_spinner(format!("Reading {}...", input.display()));
    let raw = read_rows(input).with_context(|| format!("Could not read `{}`", input.display()))?;
    bar.finish_with_message(format!("{} events read", raw.len()));

    schema.check_input(&raw)?;
    let mut destination = open_destination(target, &schema, None, || {
        make_output_file_name("haedat-essential", "csv")
    })?;

    let summary = load_records(&raw, &schema, &mut destination, target, &config).await?;

    Ok(describe_summary(&summary))
}

// -- Tests -------------------------------------------------------------------
