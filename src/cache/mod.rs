use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::config::{CacheConfig, CacheStore};

pub mod memory;
pub mod null;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to parse value: {0}")]
    Deserialization(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Cache trait defining the interface for all cache implementations.
///
/// Implementations must be thread-safe (Send + Sync) and cloneable so the
/// cache can be shared across concurrent authentication flows.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Store a value in the cache under the backend's fixed TTL
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T)
        -> Result<(), CacheError>;

    /// Retrieve a value from the cache; `Ok(None)` means no live entry
    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError>;

    /// Delete a value from the cache
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache implementation that provides a uniform interface regardless of
/// backend. The concrete implementation is chosen at startup based on
/// configuration.
#[derive(Clone)]
pub enum Cache {
    /// In-memory cache implementation using Moka
    InMemory(memory::InMemoryCache),
    /// No-op cache implementation that doesn't actually cache anything
    Null(null::NullCache),
}

#[async_trait::async_trait]
impl CacheBackend for Cache {
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), CacheError> {
        match self {
            Self::InMemory(cache) => cache.set(key, value).await,
            Self::Null(cache) => cache.set(key, value).await,
        }
    }

    async fn get<T: DeserializeOwned + Send + Sync>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        match self {
            Self::InMemory(cache) => cache.get(key).await,
            Self::Null(cache) => cache.get(key).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        match self {
            Self::InMemory(cache) => cache.delete(key).await,
            Self::Null(cache) => cache.delete(key).await,
        }
    }
}

/// Factory function creating the configured cache implementation
pub fn create_cache(config: &CacheConfig) -> Result<Cache, CacheError> {
    match config.store {
        CacheStore::InMemory => {
            if config.max_entries == 0 {
                return Err(CacheError::Config(
                    "cache max_entries must be positive".to_string(),
                ));
            }
            let cache = memory::InMemoryCache::new(config.ttl_secs(), config.max_entries);
            Ok(Cache::InMemory(cache))
        }
        CacheStore::None => Ok(Cache::Null(null::NullCache::new())),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cache::memory::InMemoryCache;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
    struct TestValue {
        field: String,
    }

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = Cache::InMemory(InMemoryCache::new(60, 128));

        let test_value = TestValue {
            field: "test_value".to_string(),
        };
        cache
            .set("test_key", &test_value)
            .await
            .expect("Failed to set value");
        let value: Option<TestValue> = cache.get("test_key").await.expect("Failed to get value");
        assert_eq!(value, Some(test_value));

        let value: Option<TestValue> = cache
            .get("non_existent")
            .await
            .expect("Failed to get value");
        assert_eq!(value, None);

        cache
            .delete("test_key")
            .await
            .expect("Failed to delete value");
        let value: Option<TestValue> = cache.get("test_key").await.expect("Failed to get value");
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_cache_ttl() {
        let cache = Cache::InMemory(InMemoryCache::new(1, 128));

        let test_value = TestValue {
            field: "ttl_value".to_string(),
        };
        cache
            .set("ttl_key", &test_value)
            .await
            .expect("Failed to set value");

        let value: Option<TestValue> = cache.get("ttl_key").await.expect("Failed to get value");
        assert_eq!(value, Some(test_value));

        tokio::time::sleep(Duration::from_secs(2)).await;

        let value: Option<TestValue> = cache.get("ttl_key").await.expect("Failed to get value");
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_negative_values_are_cacheable() {
        // the repository caches Option<Entity>; a cached None must be
        // distinguishable from "nothing cached"
        let cache = Cache::InMemory(InMemoryCache::new(60, 128));

        let negative: Option<TestValue> = None;
        cache.set("missing_key", &negative).await.unwrap();

        let cached: Option<Option<TestValue>> = cache.get("missing_key").await.unwrap();
        assert_eq!(cached, Some(None));

        let uncached: Option<Option<TestValue>> = cache.get("other_key").await.unwrap();
        assert_eq!(uncached, None);
    }

    #[tokio::test]
    async fn test_null_cache_never_stores() {
        let cache = create_cache(&CacheConfig {
            store: CacheStore::None,
            ..CacheConfig::default()
        })
        .unwrap();

        let test_value = TestValue {
            field: "x".to_string(),
        };
        cache.set("key", &test_value).await.unwrap();
        let value: Option<TestValue> = cache.get("key").await.unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = create_cache(&CacheConfig {
            max_entries: 0,
            ..CacheConfig::default()
        });
        assert!(matches!(result, Err(CacheError::Config(_))));
    }
}
