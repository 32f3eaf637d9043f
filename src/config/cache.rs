//! Credential cache configuration

use confique::Config;
use serde::Deserialize;

/// Specifies which cache store implementation to use
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStore {
    #[default]
    InMemory,
    /// Disables caching entirely; every lookup goes to the backing store
    #[serde(other)]
    None,
}

/// Configuration for the repository-facing credential cache
#[derive(Debug, Config, Clone)]
pub struct CacheConfig {
    /// Cache TTL in minutes (default: 5). A cache hit is never staler
    /// than this.
    #[config(env = "AUTH_CACHE_TTL_MINUTES", default = 5)]
    pub ttl_minutes: u64,

    /// Maximum number of cached entries (default: 100)
    #[config(env = "AUTH_CACHE_MAX_ENTRIES", default = 100)]
    pub max_entries: u64,

    /// Cache store type: "in-memory" (default) or "none"
    #[config(env = "AUTH_CACHE_STORE", default = "in-memory")]
    pub store: CacheStore,
}

impl CacheConfig {
    /// TTL expressed in seconds, as the cache backends consume it
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_minutes * 60
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 5,
            max_entries: 100,
            store: CacheStore::InMemory,
        }
    }
}
