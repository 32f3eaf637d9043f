//! Salted, memory-hard secret hashing shared by user passwords and client
//! secrets.
//!
//! The primary format is an Argon2id PHC string: self-describing (algorithm,
//! version, parameters, salt, digest), so verification needs no external
//! parameter lookup. Two weaker stored formats are accepted as verification
//! degrade paths for existing data:
//!
//! - `$2a$10$<base64>` — a historical wrapper around a plain base64-encoded
//!   secret. Not a hash; a time-boxed migration shim only.
//! - anything else — compared as plaintext, for local/dev fixtures only.
//!
//! Neither legacy path is ever produced by [`SecretHasher::hash`]. All
//! comparisons run in constant time with respect to where a mismatch occurs.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, warn};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::HashingConfig;

/// Prefix of the historical base64-wrapped secret format
const LEGACY_BASE64_PREFIX: &str = "$2a$10$";

/// Fixed input used to derive the dummy hash for timing-parity verification
const DUMMY_SECRET: &str = "timing-equalizer-placeholder";

/// Errors surfaced by the hashing module
#[derive(Debug, Error)]
pub enum HashingError {
    /// Caller error: hashing or verifying an empty secret is always a bug
    /// upstream, reported synchronously rather than swallowed
    #[error("secret must not be empty")]
    EmptySecret,
    #[error("invalid hashing parameters: {0}")]
    InvalidParams(String),
    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// Derives and verifies Argon2id secret hashes.
///
/// Stateless with respect to call-to-call data; safe to share across tasks.
#[derive(Clone)]
pub struct SecretHasher {
    config: HashingConfig,
    /// Precomputed hash of a fixed placeholder, verified on lookup misses so
    /// that "no such principal" takes as long as "wrong secret"
    dummy_hash: String,
}

impl SecretHasher {
    /// Validates the cost parameters and precomputes the dummy hash.
    pub fn new(config: &HashingConfig) -> Result<Self, HashingError> {
        // Fail fast on bad parameters instead of on the first login.
        Self::params(config)?;
        let mut hasher = Self {
            config: config.clone(),
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash(DUMMY_SECRET)?;
        Ok(hasher)
    }

    fn params(config: &HashingConfig) -> Result<Params, HashingError> {
        Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(config.output_length),
        )
        .map_err(|e| HashingError::InvalidParams(e.to_string()))
    }

    fn argon2(&self) -> Result<Argon2<'static>, HashingError> {
        Ok(Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Self::params(&self.config)?,
        ))
    }

    /// Hashes a secret into a self-describing PHC string with a fresh
    /// random salt. Two calls with the same secret yield different strings.
    pub fn hash(&self, secret: &str) -> Result<String, HashingError> {
        if secret.is_empty() {
            return Err(HashingError::EmptySecret);
        }
        let mut salt_bytes = vec![0u8; self.config.salt_length];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| HashingError::InvalidParams(e.to_string()))?;
        let hash = self
            .argon2()?
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| HashingError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verifies a candidate secret against a stored value, sniffing the
    /// stored format by prefix.
    ///
    /// Returns `Err` only for an empty candidate secret (a caller error).
    /// Every malformed or undecodable stored value degrades to `Ok(false)`;
    /// diagnostics never include the secret or the stored value itself.
    pub fn verify(&self, secret: &str, stored: &str) -> Result<bool, HashingError> {
        if secret.is_empty() {
            return Err(HashingError::EmptySecret);
        }
        if stored.is_empty() {
            debug!("verification against empty stored value rejected");
            return Ok(false);
        }
        if stored.starts_with("$argon2") {
            Ok(self.verify_argon2(secret, stored))
        } else if let Some(wrapped) = stored.strip_prefix(LEGACY_BASE64_PREFIX) {
            Ok(verify_legacy_base64(secret, wrapped))
        } else {
            // Plaintext stored secret: local/dev compatibility only.
            Ok(constant_time_eq(secret.as_bytes(), stored.as_bytes()))
        }
    }

    fn verify_argon2(&self, secret: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("stored argon2 hash failed to parse: {}", e);
                return false;
            }
        };
        let argon2 = match self.argon2() {
            Ok(argon2) => argon2,
            Err(e) => {
                warn!("argon2 instance unavailable during verification: {}", e);
                return false;
            }
        };
        // verify_password re-derives with the parameters embedded in the
        // hash string and compares digests in constant time.
        argon2.verify_password(secret.as_bytes(), &parsed).is_ok()
    }

    /// Whether a stored value is in the primary self-describing hash format
    pub fn is_valid_format(stored: &str) -> bool {
        stored.starts_with("$argon2") && PasswordHash::new(stored).is_ok()
    }

    /// Runs a full verification against the precomputed placeholder hash and
    /// discards the result. Called on principal-lookup misses and disabled
    /// accounts so their failure timing matches a wrong-secret failure.
    pub fn dummy_verify(&self) {
        let _ = self.verify_argon2("not-the-placeholder", &self.dummy_hash);
    }
}

/// Compares the candidate against the base64 payload of the legacy wrapper
fn verify_legacy_base64(secret: &str, wrapped: &str) -> bool {
    match STANDARD.decode(wrapped) {
        Ok(decoded) => constant_time_eq(secret.as_bytes(), &decoded),
        Err(_) => {
            debug!("legacy-format stored value failed base64 decoding");
            false
        }
    }
}

/// Accumulated-OR byte comparison; never early-returns on the first
/// differing byte. Slices of different length compare unequal.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
