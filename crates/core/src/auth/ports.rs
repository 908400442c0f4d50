//! Port interfaces for authorization data
//!
//! These traits define the boundary between core business logic and the
//! infrastructure that talks to the remote store.

use async_trait::async_trait;
use paydesk_domain::{Result, UserRole};

/// Read access to the remote profile records
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the role attached to a user identity
    ///
    /// Returns `Ok(None)` when the store has no matching record or the
    /// record carries no role; errors are reserved for failed lookups.
    async fn role_for_user(&self, user_id: &str) -> Result<Option<UserRole>>;
}
