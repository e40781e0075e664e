//! Destination stores that clean records are loaded into.

pub mod csv;
pub mod parquet;
pub mod rest;

use std::path::Path;

use crate::{
    error::StoreError,
    record::{CleanRecord, Schema},
};

pub use self::csv::CsvStore;
pub use self::parquet::ParquetStore;
pub use rest::RestStore;

/// A table-shaped destination accepting whole batches.
///
/// Each `insert` is one write request. A store is driven by a single caller
/// and never sees two batches in flight.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    async fn insert(&mut self, batch: &[CleanRecord]) -> Result<(), StoreError>;

    /// Flushes and releases the store once every batch is written.
    async fn finish(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Releases the store after a failed run. Batches already inserted stay
    /// readable; stores that buffer must not lose them here.
    async fn abort(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Any of the concrete stores, picked at runtime from the command line.
pub enum Destination {
    Rest(RestStore),
    Parquet(ParquetStore),
    Csv(CsvStore),
}

impl Destination {
    /// Opens a file store, choosing the format from the extension (`.parquet` or `.csv`).
    pub fn file(file_path: &Path, schema: &Schema) -> Result<Self, StoreError> {
        match file_path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => {
                Ok(Destination::Parquet(ParquetStore::create(file_path, schema)?))
            }
            _ => Ok(Destination::Csv(CsvStore::create(file_path, schema)?)),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Destination::Rest(_) => "table store",
            Destination::Parquet(_) => "parquet file",
            Destination::Csv(_) => "csv file",
        }
    }
}

impl RecordStore for Destination {
    async fn insert(&mut self, batch: &[CleanRecord]) -> Result<(), StoreError> {
        match self {
            Destination::Rest(store) => store.insert(batch).await,
            Destination::Parquet(store) => store.insert(batch).await,
            Destination::Csv(store) => store.insert(batch).await,
        }
    }

    async fn finish(&mut self) -> Result<(), StoreError> {
        match self {
            Destination::Rest(store) => store.finish().await,
            Destination::Parquet(store) => store.finish().await,
            Destination::Csv(store) => store.finish().await,
        }
    }

    async fn abort(&mut self) -> Result<(), StoreError> {
        match self {
            Destination::Rest(store) => store.abort().await,
            Destination::Parquet(store) => store.abort().await,
            Destination::Csv(store) => store.abort().await,
        }
    }
}

// -- Tests -------------------------------------------------------------------
