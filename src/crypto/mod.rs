//! Cryptographic primitives for LockVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption of credential secrets (`encryption`)
//! - Argon2id master-password key derivation (`kdf`)
//! - HKDF-based key/verifier splitting and zeroizing key wrappers (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_master_secret, ...};
pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_master_secret, generate_salt, KdfParams};
pub use keys::{split_master_secret, DerivedKeys, SessionKey, Verifier};
