//! Settings read once from the environment (and a `.env` file, if present).

use crate::error::ConfigError;

pub const STORE_URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const STORE_KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
pub const BATCH_SIZE_VAR: &str = "OCCLOAD_BATCH_SIZE";
pub const GBIF_API_VAR: &str = "GBIF_API_URL";

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_GBIF_API_URL: &str = "https://api.gbif.org/v1";

/// Endpoint and credential of the REST table store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub batch_size: usize,
    pub gbif_api_url: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(STORE_URL_VAR).ok_or(ConfigError::MissingVar {
            name: STORE_URL_VAR,
        })?;
        let api_key = lookup(STORE_KEY_VAR).ok_or(ConfigError::MissingVar {
            name: STORE_KEY_VAR,
        })?;

        Ok(StoreConfig { url, api_key })
    }
}

impl LoaderConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let batch_size = match lookup(BATCH_SIZE_VAR) {
            Some(value) => parse_batch_size(&value)?,
            None => DEFAULT_BATCH_SIZE,
        };
        let gbif_api_url =
            lookup(GBIF_API_VAR).unwrap_or_else(|| DEFAULT_GBIF_API_URL.to_string());

        Ok(LoaderConfig {
            batch_size,
            gbif_api_url,
        })
    }
}

pub fn parse_batch_size(value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| ConfigError::InvalidBatchSize {
            value: value.to_string(),
        })
}

// Empty variables count as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// -- Tests -------------------------------------------------------------------
