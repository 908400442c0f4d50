//! Store-specific error types

use std::time::Duration;

use paydesk_domain::PaydeskError;
use thiserror::Error;

/// Errors raised while talking to the remote store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Conversion into the domain error used at the port boundary
impl From<StoreError> for PaydeskError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Auth(message) => Self::Auth(message),
            StoreError::Config(message) => Self::Config(message),
            StoreError::Network(message) => Self::Network(message),
            StoreError::Timeout(timeout) => {
                Self::Network(format!("request timed out after {timeout:?}"))
            }
            StoreError::RateLimit(message)
            | StoreError::Server(message)
            | StoreError::Client(message) => Self::Store(message),
            StoreError::Decode(message) => {
                Self::Store(format!("failed to decode response: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_mapping() {
        let err: PaydeskError = StoreError::Auth("401".to_string()).into();
        assert!(matches!(err, PaydeskError::Auth(_)));

        let err: PaydeskError = StoreError::Server("500".to_string()).into();
        assert!(matches!(err, PaydeskError::Store(_)));

        let err: PaydeskError = StoreError::Timeout(Duration::from_secs(30)).into();
        assert!(matches!(err, PaydeskError::Network(_)));
    }
}
