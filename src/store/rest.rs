//! PostgREST-style table store (as served by Supabase).

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use super::RecordStore;
use crate::{config::StoreConfig, error::StoreError, record::CleanRecord};

pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig, table: &str) -> Self {
        RestStore {
            client: Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            table: table.to_string(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Reads up to `limit` rows. Used to verify a load, not by the loader itself.
    pub async fn select(&self, limit: usize) -> Result<Vec<Value>, StoreError> {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("select", "*".to_string()), ("limit", limit.to_string())]);

        let response = check(self.authorize(request).send().await?).await?;

        Ok(response.json::<Vec<Value>>().await?)
    }
}

impl RecordStore for RestStore {
    async fn insert(&mut self, batch: &[CleanRecord]) -> Result<(), StoreError> {
        debug!(table = %self.table, rows = batch.len(), "posting batch");

        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=minimal")
            .json(batch);

        check(self.authorize(request).send().await?).await?;

        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}

// -- Tests -------------------------------------------------------------------
