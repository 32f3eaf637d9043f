//! HTTP Basic Authentication flow:
//! Start → UserLookup → StatusCheck → PasswordVerify → Result.

use log::{debug, error, info, warn};
use std::time::Instant;

use super::models::AuthResult;
use super::{AuthFlowError, Authenticator};

/// Reason code for a failed password check; also used for unknown users so
/// the two cases stay indistinguishable to the caller
pub const REASON_INVALID_PASSWORD: &str = "invalid_password";
/// Reason code for a principal that exists but may not authenticate
pub const REASON_ACCOUNT_DISABLED: &str = "account_disabled";
/// Generic reason for unexpected internal failures; detail is logged, never
/// returned
pub const REASON_INTERNAL_ERROR: &str = "internal authentication error";

impl Authenticator {
    /// Authenticates a username/password pair.
    ///
    /// Lookup misses and disabled accounts run a dummy hash verification so
    /// their failure timing is indistinguishable from a wrong password.
    /// Every branch carries `duration_ms` metadata; unexpected errors are
    /// caught here and converted to a generic failure.
    pub async fn authenticate_basic(&self, username: &str, password: &str) -> AuthResult {
        let started = Instant::now();
        self.metrics.record_attempt();

        let result = match self.basic_flow(username, password).await {
            Ok(result) => result,
            Err(e) => {
                error!("unexpected error during basic authentication: {}", e);
                AuthResult::failure(REASON_INTERNAL_ERROR)
            }
        };

        self.metrics.record_outcome(result.allowed);
        result
            .with_metadata("auth_method", "basic")
            .with_metadata("duration_ms", started.elapsed().as_millis().to_string())
    }

    async fn basic_flow(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResult, AuthFlowError> {
        if username.trim().is_empty() || password.is_empty() {
            debug!("basic authentication rejected: blank credentials");
            return Ok(AuthResult::failure("missing credentials"));
        }

        let user = match self.users.find(username).await? {
            Some(user) => user,
            None => {
                // timing parity with the wrong-password branch
                self.hasher.dummy_verify();
                info!("basic authentication failed: unknown user");
                return Ok(AuthResult::failure(REASON_INVALID_PASSWORD));
            }
        };

        if !user.is_active() {
            self.hasher.dummy_verify();
            warn!("basic authentication failed for '{}': account not active", user.username);
            return Ok(AuthResult::failure(REASON_ACCOUNT_DISABLED));
        }

        if self.hasher.verify(password, &user.password_hash)? {
            info!("basic authentication succeeded for '{}'", user.username);
            Ok(AuthResult::success(user.username.clone(), "authenticated")
                .with_metadata("roles", user.roles.join(",")))
        } else {
            info!("basic authentication failed for '{}': wrong password", user.username);
            Ok(AuthResult::failure(REASON_INVALID_PASSWORD))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{demo_user, test_authenticator, test_hasher};
    use crate::models::{User, UserStatus};

    fn authenticator_with_demo() -> super::super::Authenticator {
        let hasher = test_hasher();
        test_authenticator(vec![demo_user(&hasher)], vec![])
    }

    #[tokio::test]
    async fn test_correct_password_is_allowed() {
        let auth = authenticator_with_demo();
        let result = auth.authenticate_basic("demo", "correct horse").await;
        assert!(result.allowed);
        assert_eq!(result.identity.as_deref(), Some("demo"));
        assert_eq!(result.metadata.get("roles").map(String::as_str), Some("user"));
        assert!(result.metadata.contains_key("duration_ms"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let auth = authenticator_with_demo();
        let result = auth.authenticate_basic("demo", "battery staple").await;
        assert!(!result.allowed);
        assert_eq!(result.message, REASON_INVALID_PASSWORD);
        assert!(result.identity.is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_looks_like_wrong_password() {
        let auth = authenticator_with_demo();
        let result = auth.authenticate_basic("nobody", "whatever").await;
        assert!(!result.allowed);
        // same reason code as the wrong-password case, no enumeration signal
        assert_eq!(result.message, REASON_INVALID_PASSWORD);
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let auth = authenticator_with_demo();
        let result = auth.authenticate_basic("DEMO", "correct horse").await;
        assert!(result.allowed);
    }

    #[tokio::test]
    async fn test_disabled_account_is_rejected_with_correct_password() {
        let hasher = test_hasher();
        let disabled = User::new(
            "locked",
            hasher.hash("correct horse").unwrap(),
            UserStatus::Disabled,
            vec![],
        );
        let auth = test_authenticator(vec![disabled], vec![]);
        let result = auth.authenticate_basic("locked", "correct horse").await;
        assert!(!result.allowed);
        assert_eq!(result.message, REASON_ACCOUNT_DISABLED);
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected() {
        let auth = authenticator_with_demo();
        assert!(!auth.authenticate_basic("", "x").await.allowed);
        assert!(!auth.authenticate_basic("demo", "").await.allowed);
        assert!(!auth.authenticate_basic("   ", "x").await.allowed);
    }

    #[tokio::test]
    async fn test_metrics_track_outcomes() {
        let auth = authenticator_with_demo();
        auth.authenticate_basic("demo", "correct horse").await;
        auth.authenticate_basic("demo", "wrong").await;
        let metrics = auth.metrics();
        assert_eq!(metrics.attempts, 2);
        assert_eq!(metrics.successes, 1);
        assert_eq!(metrics.failures, 1);
    }
}
