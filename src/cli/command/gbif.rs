//! Fetch fungal occurrences from GBIF and load them.

use anyhow::Result;
use tracing::warn;

use super::{describe_summary, load_records, make_output_file_name, open_destination};
use crate::{
    cli::{create_spinner, TargetArgs},
    config::LoaderConfig,
    record::Schema,
    source::{fetch_occurrences, OccurrenceQuery},
    store::Destination,
};

pub const DEFAULT_TABLE: &str = "gbif_fungal_observations";

/// Rows read back after a load.
const VERIFY_LIMIT: usize = 5;

pub async fn gbif(query: OccurrenceQuery, target: &TargetArgs) -> Result<String> {
    let config = LoaderConfig::from_env()?;
    let schema = Schema::gbif_occurrence();

    let bar = create_spinner(format!(
        "Searching GBIF occurrences (taxon {}, {})...",
        query.taxon_key, query.continent
    ));
    let raw = fetch_occurrences(&config.gbif_api_url, &query).await?;
    bar.finish_with_message(format!("{} occurrences received", raw.len()));

    schema.check_input(&raw)?;
    let mut destination = open_destination(target, &schema, Some(DEFAULT_TABLE), || {
        make_output_file_name("gbif-occurrences", "parquet")
    })?;

    let summary = load_records(&raw, &schema, &mut destination, target, &config).await?;

    if let Destination::Rest(store) = &destination {
        match store.select(VERIFY_LIMIT).await {
            Ok(rows) => {
                println!("Verification: found {} records in `{}`", rows.len(), store.table());
                if let Some(first) = rows.first() {
                    println!("Sample record: {first}");
                }
            }
            Err(e) => warn!("Verification read failed: {e}"),
        }
    }

    Ok(describe_summary(&summary))
}
