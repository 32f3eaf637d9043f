//! OAuth client entity

use serde::{Deserialize, Serialize};

/// Grant type implemented by this engine
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

/// Account status of an OAuth client.
///
/// Unknown values in stored records deserialize to `Suspended`, the most
/// restrictive status; a malformed record must never become `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientStatus {
    Active,
    Disabled,
    #[serde(other)]
    #[default]
    Suspended,
}

/// A registered OAuth client. Immutable; equality is defined by
/// `client_id` alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier
    pub client_id: String,
    /// Self-describing client-secret hash string
    pub secret_hash: String,
    pub status: ClientStatus,
    /// Ordered allow-list of grantable scopes
    #[serde(default)]
    pub allowed_scopes: Vec<String>,
    /// Grant types this client may use; must include `client_credentials`
    /// to obtain tokens
    #[serde(default = "default_grant_types")]
    pub grant_types: Vec<String>,
    /// Default lifetime for tokens issued to this client, in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    #[serde(default)]
    pub description: String,
}

fn default_grant_types() -> Vec<String> {
    vec![GRANT_CLIENT_CREDENTIALS.to_string()]
}

fn default_token_ttl() -> u64 {
    3600
}

impl Client {
    /// Whether the client may authenticate at all
    pub fn can_authenticate(&self) -> bool {
        self.status == ClientStatus::Active
    }

    pub fn allows_grant(&self, grant_type: &str) -> bool {
        self.grant_types.iter().any(|g| g == grant_type)
    }

    pub fn allows_scope(&self, scope: &str) -> bool {
        self.allowed_scopes.iter().any(|s| s == scope)
    }

    /// Default scope when none was requested: prefer `read` if allowed,
    /// else the first allowed scope, else none.
    pub fn default_scope(&self) -> Option<&str> {
        if self.allows_scope("read") {
            Some("read")
        } else {
            self.allowed_scopes.first().map(String::as_str)
        }
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.client_id == other.client_id
    }
}

impl Eq for Client {}
