//! AES-256-GCM authenticated encryption of one credential secret.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext, so the same secret encrypted twice
//! never produces the same blob.  `decrypt` splits the nonce back out
//! before decrypting and fails closed on any tampering.
//!
//! Layout of the stored blob:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{LockVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| LockVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Fresh random nonce per call — nonce reuse would break GCM.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| LockVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    // Prepend the nonce so the caller only needs to store one blob.
    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt a blob that was produced by `encrypt`.
///
/// Expects the first 12 bytes to be the nonce, followed by the
/// ciphertext and tag.  A blob too short to contain both is a format
/// error; a tag mismatch (wrong key or corrupted data) is a
/// `DecryptionFailed` with no further detail.
pub fn decrypt(key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    // A valid blob carries at least the nonce and the tag.
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(LockVaultError::Validation(format!(
            "encrypted blob too short ({} bytes, need at least {})",
            blob.len(),
            NONCE_LEN + TAG_LEN
        )));
    }

    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| LockVaultError::DecryptionFailed)?;

    // Decrypt and verify the auth tag — never returns partial plaintext.
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| LockVaultError::DecryptionFailed)?;

    Ok(plaintext)
}
