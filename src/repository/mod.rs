//! Credential repository: the lookup surface the authenticator consumes.
//!
//! Two implementations share one trait, selected by startup configuration
//! rather than conditional compilation: [`InMemoryRepository`] seeds entities
//! in process memory (local/dev profiles), [`CachedRepository`] fronts an
//! external secret store with a TTL cache, negative caching and bounded
//! retry.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::cache::CacheError;
use crate::models::{normalize_key, Client, User};
use crate::store::StoreError;

pub mod cached;
pub mod memory;

pub use cached::CachedRepository;
pub use memory::InMemoryRepository;

/// Errors surfaced by repository operations.
///
/// Lookups degrade rather than fail wherever possible (unreachable
/// store → "not found", malformed record → "not found"), so `find`/`all`
/// rarely return these; writes via [`CachedRepository::save`] do.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// An entity the repository can manage: serializable, identified by a
/// unique id, namespaced by kind in cache and store keys.
pub trait RecordEntity:
    Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Key namespace, e.g. `user` or `client`
    const KIND: &'static str;

    /// The entity's unique identifier, original casing preserved
    fn id(&self) -> &str;
}

impl RecordEntity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.username
    }
}

impl RecordEntity for Client {
    const KIND: &'static str = "client";

    fn id(&self) -> &str {
        &self.client_id
    }
}

/// Read contract shared by all repository implementations.
///
/// Identifiers are normalized (trimmed, lowercased) before lookup, so
/// `find` is case-insensitive.
#[async_trait]
pub trait Repository<T: RecordEntity>: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<T>, RepositoryError>;

    /// All known entities, keyed by normalized identifier
    async fn all(&self) -> Result<HashMap<String, T>, RepositoryError>;
}

/// Store key for an entity record, e.g. `user/alice`
pub(crate) fn record_key<T: RecordEntity>(normalized_id: &str) -> String {
    format!("{}/{}", T::KIND, normalized_id)
}

/// Store key of the per-kind listing index, e.g. `user/__index__`
pub(crate) fn index_key<T: RecordEntity>() -> String {
    format!("{}/__index__", T::KIND)
}

/// Cache key for an entity, e.g. `client:test-client`
pub(crate) fn cache_key<T: RecordEntity>(normalized_id: &str) -> String {
    format!("{}:{}", T::KIND, normalized_id)
}
