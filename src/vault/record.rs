//! Credential record types.
//!
//! `CredentialRecord` is the full stored row including the encrypted
//! secret blob; `CredentialMetadata` is what listing returns — every
//! field except the ciphertext, which never leaves the store
//! undecrypted and is never decrypted during a list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single stored credential, owned by one user.
///
/// The `encrypted_secret` field is an opaque blob (nonce + ciphertext +
/// auth tag) produced only by `crypto::encrypt` and consumed only by
/// `crypto::decrypt`.  Serialized as base64 in JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: i64,
    pub owner_id: i64,

    /// Display title (e.g. "Mail").
    pub title: String,

    /// The login username for the stored account.
    pub username: String,

    /// Encrypted secret blob (nonce || ciphertext || tag).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub encrypted_secret: Vec<u8>,

    pub website: Option<String>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Strip the ciphertext for listing.
    pub fn metadata(&self) -> CredentialMetadata {
        CredentialMetadata {
            id: self.id,
            title: self.title.clone(),
            username: self.username.clone(),
            website: self.website.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Everything about a credential except its secret.
///
/// Returned by `list` so callers can render a table without touching
/// any ciphertext.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialMetadata {
    pub id: i64,
    pub title: String,
    pub username: String,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a credential.
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub title: String,
    pub username: String,
    /// Plaintext secret; encrypted before it ever reaches storage.
    pub secret: String,
    pub website: Option<String>,
    pub notes: Option<String>,
}

/// Partial update for an existing credential.
///
/// `None` leaves a field unchanged.  A changed secret is re-encrypted
/// with a fresh nonce.
#[derive(Debug, Clone, Default)]
pub struct CredentialUpdate {
    pub title: Option<String>,
    pub username: Option<String>,
    pub secret: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

impl CredentialUpdate {
    /// True when no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.username.is_none()
            && self.secret.is_none()
            && self.website.is_none()
            && self.notes.is_none()
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
