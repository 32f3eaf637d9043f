use confique::Config;

pub mod cache;
pub mod hashing;
pub mod repository;
pub mod token;

pub use cache::{CacheConfig, CacheStore};
pub use hashing::HashingConfig;
pub use repository::{RepositoryBackend, RepositoryConfig};
pub use token::TokenConfig;

/// Main configuration structure for the authentication engine
#[derive(Debug, Config, Clone, Default)]
pub struct AuthConfig {
    /// Token engine configuration
    #[config(nested)]
    pub token: TokenConfig,

    /// Credential cache configuration
    #[config(nested)]
    pub cache: CacheConfig,

    /// Secret hashing cost parameters
    #[config(nested)]
    pub hashing: HashingConfig,

    /// Credential repository configuration
    #[config(nested)]
    pub repository: RepositoryConfig,
}

impl AuthConfig {
    /// Loads the configuration from `AUTH_*` environment variables,
    /// falling back to the documented defaults.
    pub fn from_env() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.token.default_ttl_secs, 3600);
        assert_eq!(config.token.max_ttl_secs, 86_400);
        assert_eq!(config.cache.ttl_minutes, 5);
        assert_eq!(config.cache.max_entries, 100);
        assert_eq!(config.hashing.memory_kib, 65_536);
        assert_eq!(config.hashing.iterations, 3);
        assert_eq!(config.repository.retry_attempts, 3);
        assert_eq!(config.repository.backend, RepositoryBackend::InMemory);
    }
}
