//! OAuth 2.0 Client Credentials grant (RFC 6749 §4.4):
//! Start → GrantCheck → ClientAuth → StatusCheck → ScopeCheck →
//! ScopeResolve → Issue.

use log::{debug, error, info};
use thiserror::Error;

use super::models::{OAuthError, TokenRequest, TokenResponse};
use super::{AuthFlowError, Authenticator};
use crate::models::client::GRANT_CLIENT_CREDENTIALS;
use crate::token::TOKEN_TYPE_BEARER;

/// Failure inside the grant flow: either a well-defined OAuth error to hand
/// to the caller, or an internal fault to be logged and masked.
#[derive(Debug, Error)]
enum GrantError {
    #[error(transparent)]
    OAuth(OAuthError),
    #[error(transparent)]
    Internal(#[from] AuthFlowError),
}

impl From<OAuthError> for GrantError {
    fn from(error: OAuthError) -> Self {
        Self::OAuth(error)
    }
}

impl Authenticator {
    /// Runs the client-credentials grant and issues a bearer token.
    ///
    /// All failures map onto the RFC 6749 error vocabulary; whether a client
    /// is unknown or presented a wrong secret is deliberately not
    /// distinguishable from the response. Unexpected internal failures are
    /// caught here, logged, and surfaced as `server_error`.
    pub async fn token(&self, request: &TokenRequest) -> Result<TokenResponse, OAuthError> {
        self.metrics.record_attempt();
        let outcome = match self.grant_flow(request).await {
            Ok(response) => Ok(response),
            Err(GrantError::OAuth(e)) => {
                info!(
                    "token request for client '{}' rejected: {}",
                    request.client_id, e.error
                );
                Err(e)
            }
            Err(GrantError::Internal(e)) => {
                error!("client credentials grant failed unexpectedly: {}", e);
                Err(OAuthError::server_error("internal error"))
            }
        };
        self.metrics.record_outcome(outcome.is_ok());
        outcome
    }

    async fn grant_flow(&self, request: &TokenRequest) -> Result<TokenResponse, GrantError> {
        // GrantCheck: syntactic validation plus the supported-grant check
        request.validate()?;

        // ClientAuth: resolve and verify the secret. Absence and mismatch
        // converge on the same error; the miss branch still burns a hash
        // verification to keep timing flat.
        let client = match self.clients.find(&request.client_id).await.map_err(AuthFlowError::from)? {
            Some(client) => client,
            None => {
                self.hasher.dummy_verify();
                return Err(OAuthError::invalid_client().into());
            }
        };
        let secret_ok = self
            .hasher
            .verify(&request.client_secret, &client.secret_hash)
            .map_err(AuthFlowError::from)?;
        if !secret_ok {
            return Err(OAuthError::invalid_client().into());
        }

        // StatusCheck
        if !client.can_authenticate() {
            return Err(
                OAuthError::access_denied("client is not permitted to authenticate").into(),
            );
        }
        if !client.allows_grant(GRANT_CLIENT_CREDENTIALS) {
            return Err(OAuthError::unauthorized_client().into());
        }

        // ScopeCheck: every requested scope must be allow-listed; partial
        // overlap fails the whole request
        let requested = request.requested_scopes();
        for scope in &requested {
            if !client.allows_scope(scope) {
                return Err(OAuthError::invalid_scope(&format!(
                    "scope '{}' is not allowed for this client",
                    scope
                ))
                .into());
            }
        }

        // ScopeResolve
        let scope = if requested.is_empty() {
            client.default_scope().map(str::to_string)
        } else {
            Some(requested.join(" "))
        };

        // Issue, capped by the system-wide maximum lifetime
        let ttl = client.token_ttl_secs.min(self.max_ttl_secs);
        let (access_token, claims) = self
            .tokens
            .issue(
                &client.client_id,
                Some(&client.client_id),
                scope.as_deref(),
                ttl,
            )
            .map_err(AuthFlowError::from)?;

        self.metrics.record_token_issued();
        debug!(
            "issued token for client '{}' with scope {:?}, expires in {}s",
            client.client_id, scope, ttl
        );

        Ok(TokenResponse {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: ttl,
            scope,
            issued_at: claims.iat,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{test_authenticator, test_client, test_hasher};
    use crate::models::ClientStatus;

    fn request(scope: Option<&str>) -> TokenRequest {
        TokenRequest::new(
            "client_credentials",
            "test-client",
            "test-secret",
            scope.map(str::to_string),
        )
        .unwrap()
    }

    fn authenticator(status: ClientStatus, scopes: &[&str]) -> Authenticator {
        let hasher = test_hasher();
        test_authenticator(vec![], vec![test_client(&hasher, status, scopes)])
    }

    #[tokio::test]
    async fn test_happy_path_issues_bearer_token() {
        let auth = authenticator(ClientStatus::Active, &["read"]);
        let response = auth.token(&request(Some("read"))).await.unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.scope.as_deref(), Some("read"));
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.access_token.split('.').count(), 3);
        assert!(auth.tokens.verify(&response.access_token));
        assert_eq!(auth.metrics().tokens_issued, 1);
    }

    #[tokio::test]
    async fn test_unsupported_grant_type() {
        let auth = authenticator(ClientStatus::Active, &["read"]);
        let mut req = request(None);
        req.grant_type = "authorization_code".to_string();
        let err = auth.token(&req).await.unwrap_err();
        assert_eq!(err.error, "unsupported_grant_type");
    }

    #[tokio::test]
    async fn test_unknown_client_and_wrong_secret_are_indistinguishable() {
        let auth = authenticator(ClientStatus::Active, &["read"]);

        let mut unknown = request(None);
        unknown.client_id = "no-such-client".to_string();
        let unknown_err = auth.token(&unknown).await.unwrap_err();

        let mut wrong = request(None);
        wrong.client_secret = "wrong-secret".to_string();
        let wrong_err = auth.token(&wrong).await.unwrap_err();

        assert_eq!(unknown_err.error, "invalid_client");
        assert_eq!(wrong_err.error, "invalid_client");
        assert_eq!(unknown_err.error_description, wrong_err.error_description);
    }

    #[tokio::test]
    async fn test_disabled_client_with_correct_secret_is_access_denied() {
        let auth = authenticator(ClientStatus::Disabled, &["read"]);
        let err = auth.token(&request(Some("read"))).await.unwrap_err();
        assert_eq!(err.error, "access_denied");
    }

    #[tokio::test]
    async fn test_suspended_client_is_access_denied() {
        let auth = authenticator(ClientStatus::Suspended, &["read"]);
        let err = auth.token(&request(None)).await.unwrap_err();
        assert_eq!(err.error, "access_denied");
    }

    #[tokio::test]
    async fn test_scope_outside_allow_list_fails_whole_request() {
        let auth = authenticator(ClientStatus::Active, &["read"]);
        let err = auth.token(&request(Some("admin"))).await.unwrap_err();
        assert_eq!(err.error, "invalid_scope");

        // partial overlap must fail too, not partially grant
        let err = auth.token(&request(Some("read admin"))).await.unwrap_err();
        assert_eq!(err.error, "invalid_scope");
    }

    #[tokio::test]
    async fn test_default_scope_prefers_read() {
        let auth = authenticator(ClientStatus::Active, &["write", "read"]);
        let response = auth.token(&request(None)).await.unwrap();
        assert_eq!(response.scope.as_deref(), Some("read"));
    }

    #[tokio::test]
    async fn test_default_scope_falls_back_to_first_allowed() {
        let auth = authenticator(ClientStatus::Active, &["write", "audit"]);
        let response = auth.token(&request(None)).await.unwrap();
        assert_eq!(response.scope.as_deref(), Some("write"));
    }

    #[tokio::test]
    async fn test_no_allowed_scopes_issues_scopeless_token() {
        let auth = authenticator(ClientStatus::Active, &[]);
        let response = auth.token(&request(None)).await.unwrap();
        assert_eq!(response.scope, None);
    }

    #[tokio::test]
    async fn test_lifetime_capped_by_system_maximum() {
        let hasher = test_hasher();
        let mut client = test_client(&hasher, ClientStatus::Active, &["read"]);
        client.token_ttl_secs = 1_000_000;
        let auth = test_authenticator(vec![], vec![client]);
        let response = auth.token(&request(None)).await.unwrap();
        assert_eq!(response.expires_in, 86_400);
    }

    #[tokio::test]
    async fn test_grant_type_not_in_allow_list_is_unauthorized_client() {
        let hasher = test_hasher();
        let mut client = test_client(&hasher, ClientStatus::Active, &["read"]);
        client.grant_types = vec!["urn:ietf:params:oauth:grant-type:device_code".to_string()];
        let auth = test_authenticator(vec![], vec![client]);
        let err = auth.token(&request(None)).await.unwrap_err();
        assert_eq!(err.error, "unauthorized_client");
    }
}
