//! Integration tests for the crypto layer: Argon2id derivation, the
//! HKDF key/verifier split, and AES-256-GCM encryption.
//!
//! All KDF calls use reduced Argon2 parameters so the suite stays fast;
//! the minimums enforced by the crypto layer are exercised explicitly.

use lockvault::crypto::{
    decrypt, derive_master_secret, encrypt, generate_salt, split_master_secret, KdfParams,
};
use lockvault::errors::LockVaultError;

/// Reduced-cost params for tests (still above the enforced minimum).
fn fast_params() -> KdfParams {
    KdfParams {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

// ---------------------------------------------------------------------------
// Argon2id derivation
// ---------------------------------------------------------------------------

#[test]
fn same_password_and_salt_derive_same_secret() {
    let salt = generate_salt();
    let a = derive_master_secret(b"correct horse battery", &salt, &fast_params()).unwrap();
    let b = derive_master_secret(b"correct horse battery", &salt, &fast_params()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_salt_derives_different_secret() {
    let a = derive_master_secret(b"same password", &generate_salt(), &fast_params()).unwrap();
    let b = derive_master_secret(b"same password", &generate_salt(), &fast_params()).unwrap();
    assert_ne!(a, b);
}

#[test]
fn different_password_derives_different_secret() {
    let salt = generate_salt();
    let a = derive_master_secret(b"password-one", &salt, &fast_params()).unwrap();
    let b = derive_master_secret(b"password-two", &salt, &fast_params()).unwrap();
    assert_ne!(a, b);
}

#[test]
fn empty_password_is_rejected() {
    let salt = generate_salt();
    let result = derive_master_secret(b"", &salt, &fast_params());
    assert!(matches!(result, Err(LockVaultError::Validation(_))));
}

#[test]
fn short_salt_is_rejected() {
    let result = derive_master_secret(b"password", &[0u8; 16], &fast_params());
    assert!(matches!(result, Err(LockVaultError::Validation(_))));
}

#[test]
fn weak_kdf_params_are_rejected() {
    let salt = generate_salt();
    let weak = KdfParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
    let result = derive_master_secret(b"password", &salt, &weak);
    assert!(matches!(
        result,
        Err(LockVaultError::KeyDerivationFailed(_))
    ));
}

#[test]
fn salts_are_unique() {
    let a = generate_salt();
    let b = generate_salt();
    assert_ne!(a, b);
}

// ---------------------------------------------------------------------------
// Key / verifier split
// ---------------------------------------------------------------------------

#[test]
fn key_and_verifier_are_independent() {
    let salt = generate_salt();
    let secret = derive_master_secret(b"split me", &salt, &fast_params()).unwrap();
    let derived = split_master_secret(&secret).unwrap();

    // The AEAD key and the stored verifier must never coincide —
    // the verifier goes to disk, the key must not be recoverable from it.
    assert_ne!(derived.key.as_bytes(), derived.verifier.as_bytes());
}

#[test]
fn split_is_deterministic() {
    let salt = generate_salt();
    let secret = derive_master_secret(b"split me", &salt, &fast_params()).unwrap();
    let a = split_master_secret(&secret).unwrap();
    let b = split_master_secret(&secret).unwrap();
    assert_eq!(a.key.as_bytes(), b.key.as_bytes());
    assert!(a.verifier.matches(&b.verifier));
}

#[test]
fn verifiers_from_different_passwords_do_not_match() {
    let salt = generate_salt();
    let a = derive_master_secret(b"password-one", &salt, &fast_params()).unwrap();
    let b = derive_master_secret(b"password-two", &salt, &fast_params()).unwrap();
    let da = split_master_secret(&a).unwrap();
    let db = split_master_secret(&b).unwrap();
    assert!(!da.verifier.matches(&db.verifier));
}

// ---------------------------------------------------------------------------
// AES-256-GCM
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = [7u8; 32];
    let blob = encrypt(&key, b"hunter2").unwrap();
    let plaintext = decrypt(&key, &blob).unwrap();
    assert_eq!(plaintext, b"hunter2");
}

#[test]
fn same_plaintext_encrypts_to_different_blobs() {
    let key = [7u8; 32];
    let a = encrypt(&key, b"same secret").unwrap();
    let b = encrypt(&key, b"same secret").unwrap();
    // Fresh nonce per call.
    assert_ne!(a, b);
}

#[test]
fn wrong_key_fails_closed() {
    let blob = encrypt(&[1u8; 32], b"secret").unwrap();
    let result = decrypt(&[2u8; 32], &blob);
    assert!(matches!(result, Err(LockVaultError::DecryptionFailed)));
}

#[test]
fn tampered_ciphertext_fails_closed() {
    let key = [9u8; 32];
    let mut blob = encrypt(&key, b"integrity matters").unwrap();
    let last = blob.len() - 1;
    blob[last] ^= 0xFF;
    let result = decrypt(&key, &blob);
    assert!(matches!(result, Err(LockVaultError::DecryptionFailed)));
}

#[test]
fn tampered_nonce_fails_closed() {
    let key = [9u8; 32];
    let mut blob = encrypt(&key, b"integrity matters").unwrap();
    blob[0] ^= 0xFF;
    let result = decrypt(&key, &blob);
    assert!(matches!(result, Err(LockVaultError::DecryptionFailed)));
}

#[test]
fn truncated_blob_is_a_format_error() {
    let key = [3u8; 32];
    let result = decrypt(&key, &[0u8; 10]);
    assert!(matches!(result, Err(LockVaultError::Validation(_))));
}

#[test]
fn empty_plaintext_roundtrips() {
    let key = [5u8; 32];
    let blob = encrypt(&key, b"").unwrap();
    assert_eq!(decrypt(&key, &blob).unwrap(), b"");
}
