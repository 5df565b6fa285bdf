//! REST client for the trade review API
//!
//! Thin wrapper over `reqwest` that joins paths onto the configured base
//! address and validates array responses row by row.

use crate::domain::{parse_rows, RowBatch};
use crate::infrastructure::config::ApiConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("{path} returned HTTP {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("Deserialization failed: {0}")]
    DeserializeFailed(String),

    #[error("Unexpected response shape: {0}")]
    Schema(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Shared HTTP client bound to one API base address
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .tcp_keepalive(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// GET `path` and decode the body as JSON
    pub async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::DeserializeFailed(e.to_string()))
    }

    /// GET `path`, expecting a JSON array of `T`
    pub async fn get_rows<T: DeserializeOwned>(&self, path: &str) -> Result<RowBatch<T>> {
        let body = self.get_json(path).await?;
        parse_rows(body).map_err(|e| ApiError::Schema(e.to_string()))
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
