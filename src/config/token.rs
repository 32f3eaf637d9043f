//! Token engine configuration

use confique::Config;

/// Signing and claim configuration for issued tokens
#[derive(Debug, Config, Clone)]
pub struct TokenConfig {
    /// Shared HMAC signing key. Issuer and verifier are co-located, so a
    /// single symmetric key is sufficient. Must be non-empty; the engine
    /// refuses to start without it.
    #[config(env = "AUTH_TOKEN_SIGNING_KEY", default = "")]
    pub signing_key: String,

    /// Issuer claim stamped into every token (default: "auth-engine")
    #[config(env = "AUTH_TOKEN_ISSUER", default = "auth-engine")]
    pub issuer: String,

    /// Audience claim stamped into every token (default: "auth-engine-clients")
    #[config(env = "AUTH_TOKEN_AUDIENCE", default = "auth-engine-clients")]
    pub audience: String,

    /// Default token lifetime in seconds (default: 3600 = 1 hour)
    #[config(env = "AUTH_TOKEN_DEFAULT_TTL", default = 3600)]
    pub default_ttl_secs: u64,

    /// Hard upper bound on any issued lifetime in seconds (default: 86400)
    #[config(env = "AUTH_TOKEN_MAX_TTL", default = 86400)]
    pub max_ttl_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            signing_key: String::new(),
            issuer: "auth-engine".to_string(),
            audience: "auth-engine-clients".to_string(),
            default_ttl_secs: 3600,
            max_ttl_secs: 86_400,
        }
    }
}
