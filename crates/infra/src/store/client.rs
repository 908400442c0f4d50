//! HTTP client for the remote store
//!
//! Thin wrapper over reqwest that authenticates with the store's static
//! API key, enforces the configured request timeout and classifies failure
//! statuses into [`StoreError`]. Query construction lives in
//! [`super::query`].

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::errors::StoreError;
use super::query::QueryBuilder;
use crate::config::StoreConfig;

/// Client for a PostgREST-style remote store
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl StoreClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the base URL is invalid or the
    /// underlying HTTP client cannot be built.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let base_url = Url::parse(&config.url)
            .map_err(|e| StoreError::Config(format!("invalid store url: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url, api_key: config.api_key, timeout: config.timeout })
    }

    /// Start a query against a table
    pub fn from(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    /// Execute a built query and decode the JSON row array
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(String, String)],
        range: Option<(usize, usize)>,
    ) -> Result<Vec<T>, StoreError> {
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), table);
        debug!(url = %url, params = params.len(), "store query");

        let mut request = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .query(params);

        if let Some((from, to)) = range {
            request = request
                .header("Range-Unit", "items")
                .header("Range", format!("{from}-{to}"));
        }

        let response = match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(error = %err, url = %url, "store request failed");
                return Err(StoreError::Network(format!("{url}: {err}")));
            }
            Err(_) => return Err(StoreError::Timeout(self.timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status_error(status, &url, body));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("{url}: {e}")))
    }

    fn map_status_error(status: StatusCode, url: &str, body: String) -> StoreError {
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            StoreError::Auth(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            StoreError::RateLimit(message)
        } else if status.is_server_error() {
            StoreError::Server(message)
        } else if status.is_client_error() {
            StoreError::Client(message)
        } else {
            StoreError::Network(message)
        }
    }
}
