//! TTL-cached, retrying repository over an external secret store.
//!
//! Cache-aside: try the cache (which holds `Option<T>`, so "not found" is
//! itself cached), fall back to the store with bounded retry and exponential
//! backoff, then populate the cache with the definitive answer. A store that
//! stays unreachable degrades to "not found" for that one call without
//! touching the cache, so recovery is picked up on the next lookup. Cache
//! failures are logged and bypassed, never propagated: correctness favors
//! giving the caller an answer over surfacing cache trouble. Concurrent
//! callers may race to populate the same key; duplicate store fetches are
//! tolerated since reads are idempotent.

use async_trait::async_trait;
use log::{debug, warn};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::{cache_key, index_key, record_key, RecordEntity, Repository, RepositoryError};
use crate::cache::{Cache, CacheBackend};
use crate::config::RepositoryConfig;
use crate::models::normalize_key;
use crate::store::{SecretStore, StoreError};

pub struct CachedRepository<T: RecordEntity> {
    store: Arc<dyn SecretStore>,
    cache: Cache,
    retry_attempts: u32,
    retry_base_delay: Duration,
    retry_budget: Duration,
    /// Serializes index read-modify-write cycles across concurrent saves
    index_lock: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: RecordEntity> CachedRepository<T> {
    pub fn new(store: Arc<dyn SecretStore>, cache: Cache, config: &RepositoryConfig) -> Self {
        Self {
            store,
            cache,
            retry_attempts: config.retry_attempts.max(1),
            retry_base_delay: Duration::from_millis(config.retry_base_delay_ms),
            retry_budget: Duration::from_millis(config.retry_budget_ms),
            index_lock: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    /// Writes an entity through to the store and refreshes cache and the
    /// per-kind index record used by [`Self::all`].
    ///
    /// Index updates are serialized within this instance; writers going
    /// through a different instance (or straight to the store) still need
    /// external coordination.
    pub async fn save(&self, entity: &T) -> Result<(), RepositoryError> {
        let key = normalize_key(entity.id());
        let raw = serde_json::to_string(entity)?;
        self.store.put(&record_key::<T>(&key), &raw).await?;

        {
            let _guard = self.index_lock.lock().await;
            let mut index = self.load_index().await;
            if !index.contains(&key) {
                index.push(key.clone());
                index.sort();
                let raw_index = serde_json::to_string(&index)?;
                self.store.put(&index_key::<T>(), &raw_index).await?;
            }
        }

        // prime the cache so a save is immediately visible
        if let Err(e) = self
            .cache
            .set(&cache_key::<T>(&key), &Some(entity.clone()))
            .await
        {
            warn!("failed to prime cache after save of '{}': {}", key, e);
        }
        Ok(())
    }

    /// Drops the cached entry for `id`, forcing the next lookup back to the
    /// store. Needed after records are written to the store out of band,
    /// since `find` would otherwise serve the stale entry until TTL expiry.
    pub async fn invalidate(&self, id: &str) -> Result<(), RepositoryError> {
        let key = cache_key::<T>(&normalize_key(id));
        self.cache.delete(&key).await?;
        debug!("invalidated cache entry {}", key);
        Ok(())
    }

    async fn load_index(&self) -> Vec<String> {
        match self.store.get(&index_key::<T>()).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(index) => index,
                Err(e) => {
                    warn!("malformed {} index record: {}", T::KIND, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to load {} index record: {}", T::KIND, e);
                Vec::new()
            }
        }
    }

    /// Fetches one record from the store, retrying transient failures with
    /// exponential backoff under an overall budget. A definitive "not found"
    /// short-circuits immediately. Exhausted retries surface the last store
    /// error so the caller can tell an outage apart from a real miss.
    async fn fetch_with_retry(&self, normalized_id: &str) -> Result<Option<T>, StoreError> {
        let store_key = record_key::<T>(normalized_id);
        let deadline = Instant::now() + self.retry_budget;
        let mut delay = self.retry_base_delay;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.store.get(&store_key).await {
                Ok(Some(raw)) => return Ok(parse_record::<T>(normalized_id, &raw)),
                Ok(None) => {
                    debug!("{} '{}' not present in store", T::KIND, normalized_id);
                    return Ok(None);
                }
                Err(e) => {
                    warn!(
                        "store fetch of {} '{}' failed (attempt {}/{}): {}",
                        T::KIND,
                        normalized_id,
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    if attempt == self.retry_attempts || Instant::now() + delay >= deadline {
                        return Err(e);
                    }
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

/// Constructs the domain entity from a raw store record. Unknown status
/// values land on the restrictive variant via serde; records that fail to
/// parse entirely are logged and treated as absent.
fn parse_record<T: RecordEntity>(normalized_id: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(entity) => Some(entity),
        Err(e) => {
            warn!("malformed {} record '{}': {}", T::KIND, normalized_id, e);
            None
        }
    }
}

#[async_trait]
impl<T: RecordEntity> Repository<T> for CachedRepository<T> {
    async fn find(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        let key = normalize_key(id);
        if key.is_empty() {
            return Ok(None);
        }
        let cache_key = cache_key::<T>(&key);

        match self.cache.get::<Option<T>>(&cache_key).await {
            Ok(Some(cached)) => {
                debug!("cache hit for {}", cache_key);
                return Ok(cached);
            }
            Ok(None) => debug!("cache miss for {}", cache_key),
            Err(e) => warn!("cache error for {}: {}", cache_key, e),
        }

        let fetched = match self.fetch_with_retry(&key).await {
            Ok(fetched) => fetched,
            Err(e) => {
                // A degraded answer must not poison the cache: leave it
                // empty so the next lookup consults the recovered store.
                warn!(
                    "store unreachable; treating {} '{}' as not found: {}",
                    T::KIND,
                    key,
                    e
                );
                return Ok(None);
            }
        };

        // definitive negative results are cached too, to avoid repeated
        // store misses
        if let Err(e) = self.cache.set(&cache_key, &fetched).await {
            warn!("failed to cache result for {}: {}", cache_key, e);
        }
        Ok(fetched)
    }

    async fn all(&self) -> Result<HashMap<String, T>, RepositoryError> {
        let mut entities = HashMap::new();
        for id in self.load_index().await {
            if let Some(entity) = self.find(&id).await? {
                entities.insert(id, entity);
            }
        }
        Ok(entities)
    }
}
