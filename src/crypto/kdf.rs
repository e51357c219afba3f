//! Master-password key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Parameters are configurable via `KdfParams`
//! (loaded from `.lockvault.toml` or sensible defaults) and are stored
//! per user so a config change never locks anyone out.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use crate::errors::{LockVaultError, Result};

/// Length of the per-user salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the derived master secret in bytes (256 bits).
pub const SECRET_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Configurable Argon2id parameters.
///
/// These map 1:1 to the fields in `Settings` and to the columns stored
/// alongside each user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Derive the 32-byte master secret from a master password and salt.
///
/// The same password + salt + params will always produce the same
/// secret.  The result is *not* used directly: `crypto::keys` splits it
/// into an encryption key and a login verifier via HKDF.
///
/// Enforces minimum Argon2 parameters to prevent dangerously weak KDF
/// settings, and rejects malformed inputs before any hashing work.
pub fn derive_master_secret(
    password: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<[u8; SECRET_LEN]> {
    if password.is_empty() {
        return Err(LockVaultError::Validation(
            "master password cannot be empty".into(),
        ));
    }
    if salt.len() != SALT_LEN {
        return Err(LockVaultError::Validation(format!(
            "salt must be {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    if params.memory_kib < MIN_MEMORY_KIB {
        return Err(LockVaultError::KeyDerivationFailed(format!(
            "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
            params.memory_kib
        )));
    }
    if params.iterations < 1 {
        return Err(LockVaultError::KeyDerivationFailed(
            "Argon2 iterations must be at least 1".into(),
        ));
    }
    if params.parallelism < 1 {
        return Err(LockVaultError::KeyDerivationFailed(
            "Argon2 parallelism must be at least 1".into(),
        ));
    }

    let argon_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(SECRET_LEN),
    )
    .map_err(|e| LockVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut secret = [0u8; SECRET_LEN];
    argon2
        .hash_password_into(password, salt, &mut secret)
        .map_err(|e| {
            LockVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
        })?;

    Ok(secret)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}
