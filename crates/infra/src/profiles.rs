//! Profile store implementation
//!
//! Reads the `role` column of the remote `profiles` table. Write access to
//! profiles belongs to the hosted auth layer, not to this application.

use std::sync::Arc;

use async_trait::async_trait;
use paydesk_core::auth::ProfileStore;
use paydesk_domain::{Result, UserRole};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::store::StoreClient;

/// `ProfileStore` backed by the remote REST surface
pub struct RestProfileStore {
    client: Arc<StoreClient>,
}

impl RestProfileStore {
    pub fn new(client: Arc<StoreClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    role: Option<UserRole>,
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    #[instrument(skip(self))]
    async fn role_for_user(&self, user_id: &str) -> Result<Option<UserRole>> {
        let rows: Vec<ProfileRow> = self
            .client
            .from("profiles")
            .select("role")
            .eq("id", user_id)
            .limit(1)
            .fetch()
            .await?;

        let role = rows.into_iter().next().and_then(|row| row.role);
        debug!(role = ?role, "profile role fetched");
        Ok(role)
    }
}
