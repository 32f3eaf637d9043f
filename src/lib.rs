//! Credential issuance and verification engine.
//!
//! Implements HTTP Basic Authentication and the OAuth 2.0 Client Credentials
//! Grant (RFC 6749) including token introspection (RFC 7662):
//! - signed bearer token issuance/verification ([`token::TokenEngine`])
//! - the client-credentials grant state machine ([`auth::Authenticator`])
//! - salted, memory-hard secret hashing with constant-time verification
//!   ([`hashing::SecretHasher`])
//! - a TTL-cached, retrying credential repository over an external secret
//!   store ([`repository::CachedRepository`])
//!
//! Transport (routing, header extraction, HTTP marshaling) is deliberately
//! out of scope; this crate builds and consumes the logical wire structures
//! in [`auth::models`] and leaves serialization framing to the embedding
//! service.

pub mod auth;
pub mod cache;
pub mod config;
pub mod hashing;
pub mod models;
pub mod repository;
pub mod store;
pub mod token;

pub use auth::models::{AuthResult, IntrospectionResponse, OAuthError, TokenRequest, TokenResponse};
pub use auth::Authenticator;
pub use config::AuthConfig;
pub use hashing::SecretHasher;
pub use models::{Client, ClientStatus, User, UserStatus};
pub use repository::{CachedRepository, InMemoryRepository, Repository};
pub use store::SecretStore;
pub use token::TokenEngine;
