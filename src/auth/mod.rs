//! Authentication flows: HTTP Basic Authentication and the OAuth 2.0
//! Client Credentials grant with RFC 7662 introspection.
//!
//! The [`Authenticator`] is assembled by explicit constructor injection of
//! its collaborators (repositories, hasher, token engine); there is no
//! process-wide registry. It is stateless across requests apart from the
//! shared repositories and the atomic metrics counters, so one instance is
//! shared across all concurrent flows.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub mod basic;
pub mod grant;
pub mod introspect;
pub mod models;

use crate::hashing::{HashingError, SecretHasher};
use crate::models::{Client, User};
use crate::repository::{Repository, RepositoryError};
use crate::token::{TokenEngine, TokenError};

/// Internal failure raised partway through a flow. Never shown to callers:
/// the outermost flow methods translate it into a generic result
/// (`server_error` / "internal authentication error") and log the detail.
#[derive(Debug, Error)]
pub(crate) enum AuthFlowError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Hashing(#[from] HashingError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Process-wide authentication counters, updated with atomics
#[derive(Default)]
pub struct AuthMetrics {
    attempts: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    tokens_issued: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub tokens_issued: u64,
}

impl AuthMetrics {
    fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    fn record_outcome(&self, allowed: bool) {
        if allowed {
            self.successes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_token_issued(&self) {
        self.tokens_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            tokens_issued: self.tokens_issued.load(Ordering::Relaxed),
        }
    }
}

/// Orchestrates both authentication flows over the injected collaborators
pub struct Authenticator {
    pub(crate) users: Arc<dyn Repository<User>>,
    pub(crate) clients: Arc<dyn Repository<Client>>,
    pub(crate) hasher: SecretHasher,
    pub(crate) tokens: TokenEngine,
    /// System-wide cap on issued token lifetimes, seconds
    pub(crate) max_ttl_secs: u64,
    pub(crate) metrics: Arc<AuthMetrics>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn Repository<User>>,
        clients: Arc<dyn Repository<Client>>,
        hasher: SecretHasher,
        tokens: TokenEngine,
        max_ttl_secs: u64,
    ) -> Self {
        Self {
            users,
            clients,
            hasher,
            tokens,
            max_ttl_secs,
            metrics: Arc::new(AuthMetrics::default()),
        }
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
