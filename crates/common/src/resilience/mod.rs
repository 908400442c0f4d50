//! Resilience patterns for fault tolerance
//!
//! Provides a generic retry executor with pluggable backoff strategies and
//! the `Clock` abstraction used for deterministic time-based tests.

pub mod clock;
pub mod retry;

pub use clock::{Clock, MockClock, SystemClock};
pub use retry::{
    policies, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError,
    RetryExecutor, RetryPolicy, RetryResult,
};
