//! Credential repository configuration

use confique::Config;
use serde::Deserialize;

/// Which repository implementation to wire at startup
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryBackend {
    /// Entities seeded in process memory; for local/dev profiles
    #[default]
    InMemory,
    /// TTL-cached adapter over an external secret store
    Store,
}

/// Configuration for the credential repository and its store retry policy
#[derive(Debug, Config, Clone)]
pub struct RepositoryConfig {
    /// Repository backend: "in-memory" (default) or "store"
    #[config(env = "AUTH_REPOSITORY_BACKEND", default = "in-memory")]
    pub backend: RepositoryBackend,

    /// Maximum backing-store attempts per fetch (default: 3)
    #[config(env = "AUTH_REPOSITORY_RETRY_ATTEMPTS", default = 3)]
    pub retry_attempts: u32,

    /// Initial backoff delay in milliseconds, doubled per attempt
    /// (default: 50)
    #[config(env = "AUTH_REPOSITORY_RETRY_BASE_DELAY_MS", default = 50)]
    pub retry_base_delay_ms: u64,

    /// Overall retry budget in milliseconds; a slow store never stalls a
    /// caller longer than this (default: 2000)
    #[config(env = "AUTH_REPOSITORY_RETRY_BUDGET_MS", default = 2000)]
    pub retry_budget_ms: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            backend: RepositoryBackend::InMemory,
            retry_attempts: 3,
            retry_base_delay_ms: 50,
            retry_budget_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_repository_config() {
        let config = RepositoryConfig::default();
        assert_eq!(config.backend, RepositoryBackend::InMemory);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_base_delay_ms, 50);
        assert_eq!(config.retry_budget_ms, 2000);
    }

    #[test]
    fn test_backend_parsing() {
        let backend: RepositoryBackend = serde_json::from_str("\"store\"").unwrap();
        assert_eq!(backend, RepositoryBackend::Store);
    }
}
