//! In-process session registry — the session key holder.
//!
//! An authenticated session maps an opaque random token to the user's
//! derived encryption key.  The key lives only inside a zero-on-drop
//! `SessionKey` buffer behind a mutex; it is never serialized, never
//! written to disk, and is destroyed on logout or expiry.  Callers get
//! at the key only through `with_key`, a scoped borrow that ends when
//! the operation returns.

use std::collections::HashMap;
use std::sync::Mutex;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::crypto::SessionKey;
use crate::errors::{LockVaultError, Result};

/// Number of random bytes in a session token (before base64).
const TOKEN_LEN: usize = 32;

/// The identity attached to a session, safe to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: i64,
    pub email: String,
}

/// One live session: who it belongs to, the held key, and when it dies.
struct SessionEntry {
    profile: Profile,
    key: SessionKey,
    expires_at: DateTime<Utc>,
}

/// Process-local registry of active sessions.
///
/// State machine per token: inserted on successful authenticate,
/// removed on logout or on first access after expiry.  There is no way
/// to extract the key by value — re-authentication always re-derives it
/// from the master password.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Store a freshly derived key and issue the session token.
    pub fn insert(&self, profile: Profile, key: SessionKey, ttl: Duration) -> String {
        let token = generate_token();
        let entry = SessionEntry {
            profile,
            key,
            expires_at: Utc::now() + ttl,
        };

        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        sessions.insert(token.clone(), entry);
        token
    }

    /// Look up the profile for a token.
    ///
    /// Expired tokens are purged on the spot and report `Unauthenticated`,
    /// exactly like unknown tokens.
    pub fn profile(&self, token: &str) -> Result<Profile> {
        self.with_entry(token, |entry| entry.profile.clone())
    }

    /// Run `f` with scoped access to the session's key.
    ///
    /// The key never leaves the registry: the borrow ends when `f`
    /// returns, so no caller can cache it beyond its own operation.
    pub fn with_key<T>(&self, token: &str, f: impl FnOnce(&Profile, &SessionKey) -> T) -> Result<T> {
        self.with_entry(token, |entry| f(&entry.profile, &entry.key))
    }

    /// Remove a session, zeroizing its key.  Unknown tokens are a no-op
    /// so logout is always safe to call.
    pub fn remove(&self, token: &str) {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        sessions.remove(token);
    }

    /// Number of live (possibly expired but not yet purged) sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().expect("session registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entry<T>(&self, token: &str, f: impl FnOnce(&SessionEntry) -> T) -> Result<T> {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");

        let expired = match sessions.get(token) {
            Some(entry) => entry.expires_at <= Utc::now(),
            None => return Err(LockVaultError::Unauthenticated),
        };

        if expired {
            // Drop the entry so the key is zeroized now, not later.
            sessions.remove(token);
            return Err(LockVaultError::Unauthenticated);
        }

        let entry = sessions.get(token).expect("checked above");
        Ok(f(entry))
    }
}

/// Generate an opaque, URL-safe session token from 32 CSPRNG bytes.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_LEN];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
