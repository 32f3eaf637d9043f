//! Principal (end-user) entity

use serde::{Deserialize, Serialize};

/// Account status of a principal.
///
/// Unknown values in stored records deserialize to `Disabled` so a corrupted
/// or forward-versioned record can never grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    #[serde(other)]
    #[default]
    Disabled,
}

/// An end-user principal.
///
/// Immutable: status/role changes produce a new instance via the
/// `with_*` constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique username; original casing is preserved for display,
    /// lookups normalize it
    pub username: String,
    /// Self-describing password hash string (see [`crate::hashing`])
    pub password_hash: String,
    pub status: UserStatus,
    /// Ordered role set, may be empty
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        status: UserStatus,
        roles: Vec<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            status,
            roles,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Returns a copy of this user with a different status
    pub fn with_status(&self, status: UserStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Returns a copy of this user with a different role set
    pub fn with_roles(&self, roles: Vec<String>) -> Self {
        Self {
            roles,
            ..self.clone()
        }
    }
}
