//! Wire-level request/response structures and the OAuth error vocabulary.
//!
//! The transport adapter marshals these to and from HTTP; this crate only
//! builds and parses the logical structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::client::GRANT_CLIENT_CREDENTIALS;

/// OAuth 2.0 token request for the Client Credentials grant
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    /// OAuth 2.0 grant type; only `client_credentials` is supported
    pub grant_type: String,
    /// Client identifier
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
    /// Optional requested scopes, space-separated (RFC 6749 §3.3)
    pub scope: Option<String>,
}

impl TokenRequest {
    /// Fail-fast constructor: syntactically invalid requests are rejected
    /// at creation time rather than partway through the flow.
    pub fn new(
        grant_type: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: Option<String>,
    ) -> Result<Self, OAuthError> {
        let request = Self {
            grant_type: grant_type.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope,
        };
        request.validate()?;
        Ok(request)
    }

    /// Syntactic validation; also applied to deserialized requests before
    /// the grant flow runs.
    pub fn validate(&self) -> Result<(), OAuthError> {
        if self.grant_type.is_empty() {
            return Err(OAuthError::invalid_request("grant_type is required"));
        }
        if self.grant_type != GRANT_CLIENT_CREDENTIALS {
            return Err(OAuthError::unsupported_grant_type());
        }
        if self.client_id.trim().is_empty() || self.client_secret.is_empty() {
            return Err(OAuthError::invalid_request(
                "client_id and client_secret are required",
            ));
        }
        Ok(())
    }

    /// Requested scopes split on whitespace
    pub fn requested_scopes(&self) -> Vec<&str> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// OAuth 2.0 token response
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    /// The access token string
    pub access_token: String,
    /// Token type - always "Bearer"
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    /// Granted scope (space-separated), omitted when none was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Issuance timestamp, epoch seconds
    pub issued_at: u64,
}

/// OAuth 2.0 Token Introspection response (RFC 7662)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionResponse {
    /// Whether the token is active
    pub active: bool,
    /// Client identifier the token was issued to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Token scope (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expiry timestamp, epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    /// Issued-at timestamp, epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl IntrospectionResponse {
    /// The RFC 7662 fallback for any token the server cannot vouch for
    pub fn inactive() -> Self {
        Self {
            active: false,
            client_id: None,
            scope: None,
            token_type: None,
            exp: None,
            iat: None,
        }
    }
}

/// OAuth 2.0 error response (RFC 6749 §5.2).
///
/// Carried as an ordinary error value through `Result` returns; the
/// descriptions are always safe to show to the caller.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{error}")]
pub struct OAuthError {
    /// Standard error code
    pub error: String,
    /// Human-readable description, never internal detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

impl OAuthError {
    fn coded(error: &str, description: &str) -> Self {
        Self {
            error: error.to_string(),
            error_description: Some(description.to_string()),
            error_uri: None,
        }
    }

    pub fn invalid_request(description: &str) -> Self {
        Self::coded("invalid_request", description)
    }

    /// Covers both "no such client" and "wrong secret"; the two are never
    /// distinguished in the response, to prevent client enumeration
    pub fn invalid_client() -> Self {
        Self::coded("invalid_client", "client authentication failed")
    }

    pub fn invalid_grant(description: &str) -> Self {
        Self::coded("invalid_grant", description)
    }

    pub fn unauthorized_client() -> Self {
        Self::coded(
            "unauthorized_client",
            "client is not authorized for this grant type",
        )
    }

    pub fn unsupported_grant_type() -> Self {
        Self::coded(
            "unsupported_grant_type",
            "only the client_credentials grant is supported",
        )
    }

    pub fn invalid_scope(description: &str) -> Self {
        Self::coded("invalid_scope", description)
    }

    pub fn access_denied(description: &str) -> Self {
        Self::coded("access_denied", description)
    }

    pub fn server_error(description: &str) -> Self {
        Self::coded("server_error", description)
    }

    pub fn temporarily_unavailable(description: &str) -> Self {
        Self::coded("temporarily_unavailable", description)
    }
}

/// Outcome of a Basic Authentication attempt.
///
/// Created once per request and never mutated after return; metadata
/// additions produce a new instance.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    /// Outcome flag
    pub allowed: bool,
    /// Human-readable reason code
    pub message: String,
    /// Associated identity, for audit only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Free-form audit metadata (duration, failure reason, auth method)
    pub metadata: HashMap<String, String>,
}

impl AuthResult {
    pub fn success(identity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            allowed: true,
            message: message.into(),
            identity: Some(identity.into()),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            allowed: false,
            message: message.into(),
            identity: None,
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Returns a new result with the given metadata entry added
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
