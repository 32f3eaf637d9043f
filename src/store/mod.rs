//! Backing secret store contract.
//!
//! The store is an external collaborator (file, managed secret service, or
//! otherwise); the engine only requires this narrow get/put surface. Values
//! are opaque serialized records whose schema is defined per entity type by
//! the repository layer.

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::InMemoryStore;

/// Errors a backing store may raise.
///
/// "Not found" is **not** an error: `get` reports it as `Ok(None)`, which is
/// definitive and must never be retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transient transport/availability failure; eligible for retry
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
    /// Non-transient store failure
    #[error("store operation failed: {0}")]
    Io(String),
}

/// Narrow key/value contract against the external secret store
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the raw serialized record under `key`; `Ok(None)` when absent
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write the raw serialized record under `key`
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
