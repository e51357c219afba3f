//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `CredentialRecord` and friends (`record`)
//! - Owner-scoped `CredentialVault` operations (`store`)

pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use record::{CredentialMetadata, CredentialRecord, CredentialUpdate, NewCredential};
pub use store::CredentialVault;
