//! User authorization types
//!
//! Roles are capability tags attached to a user identity in the remote
//! `profiles` table; the back office only ever reads them.

use serde::{Deserialize, Serialize};

/// Authorization role attached to a user identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Client,
    Partner,
    Financial,
    Logistics,
}

impl UserRole {
    /// Wire representation used by the remote store
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Client => "client",
            Self::Partner => "partner",
            Self::Financial => "financial",
            Self::Logistics => "logistics",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
