//! OAuth 2.0 Token Introspection (RFC 7662).

use log::debug;

use super::models::IntrospectionResponse;
use super::Authenticator;

impl Authenticator {
    /// Introspects a presented token string.
    ///
    /// Active tokens get their claims echoed back; anything else, from a
    /// forged signature down to an empty string, collapses to
    /// `{active: false}`. The response never says why a token is inactive
    /// and this method never errors, per RFC 7662 §2.2.
    pub async fn introspect(&self, token: &str) -> IntrospectionResponse {
        match self.tokens.claims(token) {
            Ok(claims) => IntrospectionResponse {
                active: true,
                client_id: claims.client_id,
                scope: claims.scope,
                token_type: Some(claims.token_type),
                exp: Some(claims.exp),
                iat: Some(claims.iat),
            },
            Err(e) => {
                debug!("introspection resolved to inactive: {}", e);
                IntrospectionResponse::inactive()
            }
        }
    }
}
