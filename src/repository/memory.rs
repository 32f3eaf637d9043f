use async_trait::async_trait;
use std::collections::HashMap;

use super::{RecordEntity, Repository, RepositoryError};
use crate::models::normalize_key;

/// Repository seeded entirely in process memory.
///
/// Selected by the `in-memory` backend configuration for local and dev
/// profiles; the entity set is fixed at construction.
pub struct InMemoryRepository<T: RecordEntity> {
    entries: HashMap<String, T>,
}

impl<T: RecordEntity> InMemoryRepository<T> {
    pub fn new(seed: Vec<T>) -> Self {
        let entries = seed
            .into_iter()
            .map(|entity| (normalize_key(entity.id()), entity))
            .collect();
        Self { entries }
    }
}

#[async_trait]
impl<T: RecordEntity> Repository<T> for InMemoryRepository<T> {
    async fn find(&self, id: &str) -> Result<Option<T>, RepositoryError> {
        Ok(self.entries.get(&normalize_key(id)).cloned())
    }

    async fn all(&self) -> Result<HashMap<String, T>, RepositoryError> {
        Ok(self.entries.clone())
    }
}
