//! Error types for each stage of a load run.

use thiserror::Error;

/// Configuration read from the environment at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable `{name}` is not set")]
    MissingVar { name: &'static str },

    #[error("invalid batch size `{value}`: must be a positive integer")]
    InvalidBatchSize { value: String },
}

/// Upstream record sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to `{url}` failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("`{url}` returned {status}")]
    Status { url: String, status: u16 },

    #[error("response is missing the `{field}` array")]
    MissingResults { field: &'static str },

    #[error("failed to read spreadsheet export")]
    Csv(#[from] csv::Error),

    #[error("failed to read spreadsheet export")]
    Io(#[from] std::io::Error),

    #[error("failed to read workbook")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheet")]
    NoWorksheet,
}

/// Mismatch between a declared schema and the columns actually present.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("missing required column `{column}`")]
    MissingColumn { column: String },
}

/// Failures of a single store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to the store failed")]
    Http(#[from] reqwest::Error),

    #[error("store rejected the request with {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to write output file")]
    Io(#[from] std::io::Error),

    #[error("failed to build arrow batch")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("failed to write parquet file")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("failed to write csv file")]
    Csv(#[from] csv::Error),

    #[error("store was already closed")]
    Closed,
}

/// Failures of the batch loader. Every batch before `batch` is durable.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("batch size must be greater than zero")]
    ZeroBatchSize,

    #[error("batch {batch} failed after {inserted} records were inserted")]
    Store {
        batch: usize,
        inserted: usize,
        #[source]
        source: StoreError,
    },
}

impl LoadError {
    /// Number of records committed before the failure.
    pub fn inserted(&self) -> usize {
        match self {
            LoadError::ZeroBatchSize => 0,
            LoadError::Store { inserted, .. } => *inserted,
        }
    }
}

/// Failures of a whole pipeline run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to finalise the store")]
    Finish(#[source] StoreError),
}
