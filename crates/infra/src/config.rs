//! Store configuration
//!
//! Loads the remote store coordinates from environment variables.
//!
//! ## Environment Variables
//! - `PAYDESK_STORE_URL`: Base URL of the store's REST surface
//! - `PAYDESK_STORE_API_KEY`: Static API key sent with every request
//! - `PAYDESK_STORE_TIMEOUT_SECS`: Per-request timeout (optional, default 30)

use std::time::Duration;

use paydesk_domain::{PaydeskError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the remote store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the REST surface (e.g. `https://xyz.example.co/rest/v1`)
    pub url: String,
    /// Static API key; sent as both `apikey` and bearer token
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { url: url.into(), api_key: api_key.into(), timeout: DEFAULT_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns `PaydeskError::Config` if a required variable is missing or
    /// the timeout is not a number.
    pub fn from_env() -> Result<Self> {
        let url = env_var("PAYDESK_STORE_URL")?;
        let api_key = env_var("PAYDESK_STORE_API_KEY")?;

        let timeout = match std::env::var("PAYDESK_STORE_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    PaydeskError::Config(format!("invalid PAYDESK_STORE_TIMEOUT_SECS: {e}"))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(Self { url, api_key, timeout })
    }
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| PaydeskError::Config(format!("missing environment variable: {name}")))
}
