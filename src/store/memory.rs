use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{SecretStore, StoreError};

/// Process-local secret store for tests and single-node dev profiles
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_put_round_trip() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("user/demo").await.unwrap(), None);

        store.put("user/demo", "{\"username\":\"demo\"}").await.unwrap();
        assert_eq!(
            store.get("user/demo").await.unwrap().as_deref(),
            Some("{\"username\":\"demo\"}")
        );

        // overwrite
        store.put("user/demo", "{}").await.unwrap();
        assert_eq!(store.get("user/demo").await.unwrap().as_deref(), Some("{}"));
    }
}
