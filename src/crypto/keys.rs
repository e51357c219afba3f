//! Key material derived from the master secret.
//!
//! From the single Argon2id output we derive two independent values
//! with HKDF-SHA256 (RFC 5869) and distinct `info` strings:
//! - The **encryption key** used by the AEAD engine.
//! - The **login verifier** stored server-side to check passwords.
//!
//! Because the two come from domain-separated HKDF expansions, leaking
//! the stored verifier never reveals the encryption key.

use hkdf::Hkdf;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::crypto::kdf::SECRET_LEN;
use crate::errors::{LockVaultError, Result};

/// Length of derived sub-keys (256 bits).
pub const KEY_LEN: usize = 32;

/// HKDF context for the credential encryption key.
const ENC_KEY_INFO: &[u8] = b"lockvault:enc-key";

/// HKDF context for the login verifier.
const VERIFIER_INFO: &[u8] = b"lockvault:verifier";

/// The encryption key and login verifier for one user.
///
/// Produced together by `split_master_secret`; the caller persists the
/// verifier and hands the key to the session registry (or drops it
/// immediately during registration).
pub struct DerivedKeys {
    pub key: SessionKey,
    pub verifier: Verifier,
}

/// Split the Argon2id master secret into `(encryption key, verifier)`.
///
/// The master secret is zeroized by the caller; this function only
/// reads it.
pub fn split_master_secret(master_secret: &[u8; SECRET_LEN]) -> Result<DerivedKeys> {
    let key = SessionKey::new(hkdf_derive(master_secret, ENC_KEY_INFO)?);
    let verifier = Verifier::new(hkdf_derive(master_secret, VERIFIER_INFO)?);
    Ok(DerivedKeys { key, verifier })
}

/// Internal helper: run HKDF-SHA256 expand with the given `info`.
///
/// We skip the `extract` step and use the master secret directly as the
/// pseudo-random key (PRK), because it already has high entropy (it
/// came from Argon2id).
fn hkdf_derive(ikm: &[u8], info: &[u8]) -> Result<[u8; KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);

    let mut okm = [0u8; KEY_LEN];
    hk.expand(info, &mut okm)
        .map_err(|e| LockVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

    Ok(okm)
}

/// A wrapper around a 32-byte encryption key that automatically zeroes
/// its memory when dropped.
///
/// This is the only form in which the derived key exists for the
/// lifetime of a session.  It has no serde impls on purpose: the key
/// must never reach durable or semi-durable storage.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SessionKey {
    bytes: [u8; KEY_LEN],
}

impl SessionKey {
    /// Create a new `SessionKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to the AEAD engine).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The stored login verifier for one user.
///
/// Compared in constant time so the login path leaks no timing signal
/// about how many bytes matched.
#[derive(Clone)]
pub struct Verifier {
    bytes: [u8; KEY_LEN],
}

impl Verifier {
    /// Create a verifier from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Rebuild a verifier from a stored blob.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = slice.try_into().map_err(|_| {
            LockVaultError::Validation(format!(
                "verifier must be {KEY_LEN} bytes (got {})",
                slice.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// The raw verifier bytes (for persistence).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Constant-time equality check against another verifier.
    pub fn matches(&self, other: &Verifier) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
