//! Secret hashing cost parameters

use confique::Config;

/// Argon2id cost parameters for password and client-secret hashing.
///
/// The defaults target interactive logins; raise `memory_kib` and
/// `iterations` together when hardening against offline attacks.
#[derive(Debug, Config, Clone)]
pub struct HashingConfig {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    #[config(env = "AUTH_HASHING_MEMORY_KIB", default = 65536)]
    pub memory_kib: u32,

    /// Iteration count / time cost (default: 3)
    #[config(env = "AUTH_HASHING_ITERATIONS", default = 3)]
    pub iterations: u32,

    /// Degree of parallelism (default: 1)
    #[config(env = "AUTH_HASHING_PARALLELISM", default = 1)]
    pub parallelism: u32,

    /// Salt length in bytes (default: 16)
    #[config(env = "AUTH_HASHING_SALT_LENGTH", default = 16)]
    pub salt_length: usize,

    /// Digest output length in bytes (default: 32)
    #[config(env = "AUTH_HASHING_OUTPUT_LENGTH", default = 32)]
    pub output_length: usize,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 1,
            salt_length: 16,
            output_length: 32,
        }
    }
}

impl HashingConfig {
    /// Cheap parameters for unit tests; never use outside test code.
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            salt_length: 16,
            output_length: 32,
        }
    }
}
