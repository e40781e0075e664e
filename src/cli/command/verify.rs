//! Connection check against the table store.

use anyhow::Result;

use crate::{cli::create_spinner, config::StoreConfig, store::RestStore};

pub async fn verify(table: &str, limit: usize) -> Result<String> {
    let config = StoreConfig::from_env()?;
    let store = RestStore::new(&config, table);

    let bar = create_spinner(format!("Reading `{table}`..."));
    let rows = store.select(limit).await?;
    bar.finish_with_message("Store connection successful");

    if let Some(first) = rows.first() {
        println!("Sample record: {first}");
    }

    Ok(format!("Found {} records in `{}`", rows.len(), table))
}
