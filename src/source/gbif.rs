//! GBIF occurrence search.
//!
//! See <https://techdocs.gbif.org/en/openapi/v1/occurrence#/Searching%20occurrences>.

use serde_json::Value;
use tracing::debug;

use crate::{error::SourceError, record::RawRecord};

/// Eurotiales, the fungal order the default query targets.
pub const EUROTIALES_TAXON_KEY: u64 = 1040;

#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceQuery {
    pub continent: String,
    pub taxon_key: u64,
    pub limit: usize,
    pub offset: usize,
}

impl Default for OccurrenceQuery {
    fn default() -> Self {
        OccurrenceQuery {
            continent: "europe".to_string(),
            taxon_key: EUROTIALES_TAXON_KEY,
            limit: 100,
            offset: 0,
        }
    }
}

impl OccurrenceQuery {
    fn params(&self) -> [(&'static str, String); 4] {
        [
            ("continent", self.continent.to_uppercase()),
            ("taxonKey", self.taxon_key.to_string()),
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

/// Fetches one page of occurrences as raw records.
pub async fn fetch_occurrences(
    api_url: &str,
    query: &OccurrenceQuery,
) -> Result<Vec<RawRecord>, SourceError> {
    let url = format!("{}/occurrence/search", api_url.trim_end_matches('/'));
    let http_err = |source| SourceError::Http {
        url: url.clone(),
        source,
    };

    let response = reqwest::Client::new()
        .get(&url)
        .query(&query.params())
        .send()
        .await
        .map_err(http_err)?;

    if !response.status().is_success() {
        return Err(SourceError::Status {
            url: url.clone(),
            status: response.status().as_u16(),
        });
    }

    let body: Value = response.json().await.map_err(http_err)?;
    let records = results(body)?;
    debug!(count = records.len(), "occurrences received");

    Ok(records)
}

fn results(body: Value) -> Result<Vec<RawRecord>, SourceError> {
    let Value::Object(mut body) = body else {
        return Err(SourceError::MissingResults { field: "results" });
    };

    match body.remove("results") {
        Some(Value::Array(rows)) => Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect()),
        _ => Err(SourceError::MissingResults { field: "results" }),
    }
}

// -- Tests -------------------------------------------------------------------
