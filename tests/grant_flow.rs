//! End-to-end flows wired the way an embedding service would wire them:
//! store-backed cached repositories, a real hasher, and a real token engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use auth_engine::cache::create_cache;
use auth_engine::config::{
    CacheConfig, CacheStore, HashingConfig, RepositoryConfig, TokenConfig,
};
use auth_engine::repository::RecordEntity;
use auth_engine::store::{InMemoryStore, StoreError};
use auth_engine::{
    Authenticator, CachedRepository, Client, ClientStatus, SecretHasher, SecretStore, TokenEngine,
    TokenRequest, User, UserStatus,
};

/// Counts store reads so tests can assert on cache behavior.
struct CountingStore {
    inner: InMemoryStore,
    gets: AtomicU64,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            gets: AtomicU64::new(0),
        }
    }

    fn gets(&self) -> u64 {
        self.gets.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SecretStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.put(key, value).await
    }
}

fn hasher() -> SecretHasher {
    // light parameters, production defaults are too slow for a test suite
    SecretHasher::new(&HashingConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
        salt_length: 16,
        output_length: 32,
    })
    .unwrap()
}

fn engine() -> TokenEngine {
    TokenEngine::new(&TokenConfig {
        signing_key: "integration-signing-key".to_string(),
        ..TokenConfig::default()
    })
    .unwrap()
}

fn cache_config() -> CacheConfig {
    CacheConfig {
        ttl_minutes: 5,
        max_entries: 100,
        store: CacheStore::InMemory,
    }
}

fn repo_config() -> RepositoryConfig {
    RepositoryConfig {
        backend: Default::default(),
        retry_attempts: 3,
        retry_base_delay_ms: 5,
        retry_budget_ms: 500,
    }
}

fn repository<T: RecordEntity>(store: Arc<dyn SecretStore>) -> CachedRepository<T> {
    CachedRepository::new(store, create_cache(&cache_config()).unwrap(), &repo_config())
}

/// Full assembly over one shared backing store.
async fn build_authenticator(store: Arc<dyn SecretStore>) -> Authenticator {
    let _ = env_logger::builder().is_test(true).try_init();
    let hasher = hasher();

    let clients: CachedRepository<Client> = repository(store.clone());
    clients
        .save(&Client {
            client_id: "test-client".to_string(),
            secret_hash: hasher.hash("test-secret").unwrap(),
            status: ClientStatus::Active,
            allowed_scopes: vec!["read".to_string()],
            grant_types: vec!["client_credentials".to_string()],
            token_ttl_secs: 3600,
            description: "integration fixture".to_string(),
        })
        .await
        .unwrap();
    clients
        .save(&Client {
            client_id: "dormant-client".to_string(),
            secret_hash: hasher.hash("dormant-secret").unwrap(),
            status: ClientStatus::Disabled,
            allowed_scopes: vec!["read".to_string()],
            grant_types: vec!["client_credentials".to_string()],
            token_ttl_secs: 3600,
            description: "disabled fixture".to_string(),
        })
        .await
        .unwrap();

    let users: CachedRepository<User> = repository(store);
    users
        .save(&User::new(
            "demo",
            hasher.hash("correct horse").unwrap(),
            UserStatus::Active,
            vec!["user".to_string()],
        ))
        .await
        .unwrap();

    Authenticator::new(Arc::new(users), Arc::new(clients), hasher, engine(), 86_400)
}

fn token_request(client_id: &str, secret: &str, scope: Option<&str>) -> TokenRequest {
    TokenRequest::new("client_credentials", client_id, secret, scope.map(str::to_string)).unwrap()
}

#[tokio::test]
async fn test_client_credentials_grant_end_to_end() {
    let auth = build_authenticator(Arc::new(InMemoryStore::new())).await;

    let response = auth
        .token(&token_request("test-client", "test-secret", Some("read")))
        .await
        .unwrap();

    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.scope.as_deref(), Some("read"));
    assert_eq!(response.expires_in, 3600);
    assert_eq!(response.access_token.split('.').count(), 3);

    // the issued token introspects as active with the granted claims
    let introspection = auth.introspect(&response.access_token).await;
    assert!(introspection.active);
    assert_eq!(introspection.client_id.as_deref(), Some("test-client"));
    assert_eq!(introspection.scope.as_deref(), Some("read"));

    let metrics = auth.metrics();
    assert_eq!(metrics.tokens_issued, 1);
    assert_eq!(metrics.successes, 1);
}

#[tokio::test]
async fn test_scope_outside_allow_list_issues_nothing() {
    let auth = build_authenticator(Arc::new(InMemoryStore::new())).await;

    let err = auth
        .token(&token_request("test-client", "test-secret", Some("admin")))
        .await
        .unwrap_err();

    assert_eq!(err.error, "invalid_scope");
    assert_eq!(auth.metrics().tokens_issued, 0);
}

#[tokio::test]
async fn test_disabled_client_with_correct_secret_is_denied() {
    let auth = build_authenticator(Arc::new(InMemoryStore::new())).await;

    let err = auth
        .token(&token_request("dormant-client", "dormant-secret", Some("read")))
        .await
        .unwrap_err();

    assert_eq!(err.error, "access_denied");
}

#[tokio::test]
async fn test_basic_auth_against_store_backed_users() {
    let auth = build_authenticator(Arc::new(InMemoryStore::new())).await;

    let ok = auth.authenticate_basic("demo", "correct horse").await;
    assert!(ok.allowed);
    assert_eq!(ok.identity.as_deref(), Some("demo"));

    let wrong = auth.authenticate_basic("demo", "wrong horse").await;
    assert!(!wrong.allowed);
    assert_eq!(wrong.message, "invalid_password");

    // unknown principal reads identically to a wrong password
    let missing = auth.authenticate_basic("nobody", "correct horse").await;
    assert!(!missing.allowed);
    assert_eq!(missing.message, wrong.message);
}

#[tokio::test]
async fn test_repeated_grants_are_served_from_cache() {
    let store = Arc::new(CountingStore::new());
    let auth = build_authenticator(store.clone()).await;
    // saves prime the cache of the seeding repositories, but the
    // authenticator's repositories share those caches, so the first grant
    // resolves the client without touching the store at all
    let baseline = store.gets();

    for _ in 0..5 {
        auth.token(&token_request("test-client", "test-secret", None))
            .await
            .unwrap();
    }

    assert_eq!(store.gets(), baseline);
}

#[tokio::test]
async fn test_unknown_client_is_negatively_cached() {
    let store = Arc::new(CountingStore::new());
    let auth = build_authenticator(store.clone()).await;
    let baseline = store.gets();

    for _ in 0..3 {
        let err = auth
            .token(&token_request("ghost-client", "whatever", None))
            .await
            .unwrap_err();
        assert_eq!(err.error, "invalid_client");
    }

    // one store read for the first miss, then the negative entry answers
    assert_eq!(store.gets(), baseline + 1);
}
