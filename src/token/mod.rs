//! Signed bearer token engine.
//!
//! Tokens are compact three-segment strings mirroring the JWS compact
//! serialization: `base64url(header).base64url(payload).base64url(signature)`
//! with the signature computed as HMAC-SHA-256 over `header || "." || payload`
//! using a shared symmetric key. Issuer and verifier are co-located, so there
//! is no key-distribution concern. No server-side token state is held:
//! validity is fully determined by re-verifying the signature and re-checking
//! claims on every call.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use log::debug;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::TokenConfig;

type HmacSha256 = Hmac<Sha256>;

/// Fixed signing algorithm; the engine accepts nothing else
const ALGORITHM: &str = "HS256";
/// Fixed header type marker
const TOKEN_TYPE_HEADER: &str = "token";
/// Token type reported in claims and token responses
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Errors surfaced by the token engine.
///
/// `Malformed` (structure, base64, claim decoding) is distinguished from
/// `Invalid` (signature, expiry, issuer/audience) for logging purposes only;
/// both mean the token must not be trusted, and [`TokenEngine::verify`]
/// collapses them into `false`.
#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("signing key must not be empty")]
    EmptyKey,
    #[error("malformed token")]
    Malformed,
    #[error("invalid token")]
    Invalid,
    #[error("token issuance failed: {0}")]
    Issuance(String),
}

/// Claims carried in the token payload. Timestamps are integer epoch
/// seconds; they round-trip through decode without precision loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Subject (the client ID for client-credentials tokens)
    pub sub: String,
    /// Issued-at, epoch seconds
    pub iat: u64,
    /// Expiry, epoch seconds; the token is invalid once `now >= exp`
    pub exp: u64,
    /// Unique token ID
    pub jti: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Granted scope, space-separated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Encodes, signs, verifies and decodes bearer tokens.
///
/// Pure with respect to call-to-call data; requires no locking.
#[derive(Clone)]
pub struct TokenEngine {
    key: Vec<u8>,
    issuer: String,
    audience: String,
}

impl TokenEngine {
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.signing_key.is_empty() {
            return Err(TokenError::EmptyKey);
        }
        Ok(Self {
            key: config.signing_key.as_bytes().to_vec(),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// Issues a signed token bound to `subject`, returning the compact
    /// token string together with the claims embedded in it.
    pub fn issue(
        &self,
        subject: &str,
        client_id: Option<&str>,
        scope: Option<&str>,
        ttl_secs: u64,
    ) -> Result<(String, Claims), TokenError> {
        let now = unix_now().map_err(TokenError::Issuance)?;
        let claims = Claims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl_secs,
            jti: new_token_id(),
            client_id: client_id.map(str::to_string),
            scope: scope.map(str::to_string),
            token_type: TOKEN_TYPE_BEARER.to_string(),
        };
        let token = self.encode(&claims)?;
        debug!(
            "issued token for subject '{}', expires in {}s",
            subject, ttl_secs
        );
        Ok((token, claims))
    }

    fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE_HEADER.to_string(),
        };
        let header_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&header).map_err(|e| TokenError::Issuance(e.to_string()))?,
        );
        let payload_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(claims).map_err(|e| TokenError::Issuance(e.to_string()))?,
        );
        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature = self
            .sign(signing_input.as_bytes())
            .map_err(TokenError::Issuance)?;
        Ok(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    fn sign(&self, signing_input: &[u8]) -> Result<Vec<u8>, String> {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).map_err(|e| format!("HMAC key error: {e}"))?;
        mac.update(signing_input);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Whether the token is currently valid: intact signature, known
    /// algorithm, unexpired, matching issuer and audience. Never panics or
    /// errors; every failure mode resolves to `false`.
    pub fn verify(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }

    /// Decodes and returns the claims of a valid token.
    ///
    /// The signature is recomputed and compared in constant time before any
    /// payload field is parsed or trusted. Callers may log the
    /// `Malformed`/`Invalid` distinction but must not base trust decisions
    /// on it.
    pub fn claims(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode(token)
    }

    /// Seconds until expiry, or 0 for anything not currently valid
    pub fn remaining_lifetime(&self, token: &str) -> u64 {
        match self.decode(token) {
            Ok(claims) => {
                let now = unix_now().unwrap_or(claims.exp);
                claims.exp.saturating_sub(now)
            }
            Err(_) => 0,
        }
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header_b64, payload_b64, signature_b64] = segments[..] else {
            return Err(TokenError::Malformed);
        };

        let presented = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Malformed)?;
        let signing_input = format!("{header_b64}.{payload_b64}");
        let expected = self
            .sign(signing_input.as_bytes())
            .map_err(|_| TokenError::Invalid)?;
        if !bool::from(expected.ct_eq(&presented)) {
            return Err(TokenError::Invalid);
        }

        // Signature holds; only now is the decoded content trusted.
        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Invalid);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload_bytes).map_err(|_| TokenError::Malformed)?;

        let now = unix_now().map_err(|_| TokenError::Invalid)?;
        if now >= claims.exp {
            return Err(TokenError::Invalid);
        }
        if claims.iss != self.issuer || claims.aud != self.audience {
            return Err(TokenError::Invalid);
        }
        Ok(claims)
    }
}

/// Millisecond timestamp plus a random suffix; unique per issuance without
/// a global registry, since tokens are never persisted server-side.
fn new_token_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let mut suffix = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut suffix);
    format!("{}-{}", millis, URL_SAFE_NO_PAD.encode(suffix))
}

fn unix_now() -> Result<u64, String> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| format!("system time error: {e}"))
}
