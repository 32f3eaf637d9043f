//! Domain entities managed by the credential repository

pub mod client;
pub mod user;

pub use client::{Client, ClientStatus};
pub use user::{User, UserStatus};

/// Normalizes an identifier for lookup: trimmed, lowercased.
///
/// Lookups are case-insensitive while stored entities keep their original
/// casing for display.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  Alice "), "alice");
        assert_eq!(normalize_key("TEST-Client"), "test-client");
        assert_eq!(normalize_key(""), "");
    }
}
