//! The vault service — the operation set exposed to UI collaborators.
//!
//! `Vault` wires authentication, the session registry, and the
//! credential vault over one storage handle.  Every operation is
//! request-scoped: it takes a session token, borrows the held key for
//! the duration of the call (if it needs one), and returns.  Nothing
//! here is transport-specific; the CLI is just one caller.

use std::path::Path;

use zeroize::{Zeroize, Zeroizing};

use crate::auth;
use crate::config::Settings;
use crate::crypto::{derive_master_secret, split_master_secret, Verifier};
use crate::errors::{LockVaultError, Result};
use crate::session::{Profile, SessionRegistry};
use crate::storage::Storage;
use crate::vault::{
    CredentialMetadata, CredentialRecord, CredentialUpdate, CredentialVault, NewCredential,
};

/// Where the decryption key for a `decrypt_credential` call comes from.
pub enum KeySource<'a> {
    /// Use the key held by the caller's session.
    Session,
    /// Re-derive the key from a freshly supplied master password.  The
    /// password is checked against the stored verifier first; a
    /// mismatch reports the same generic decryption failure as a
    /// corrupted record.
    MasterPassword(&'a str),
}

/// The credential vault service.
pub struct Vault {
    storage: Storage,
    sessions: SessionRegistry,
    settings: Settings,
}

impl Vault {
    /// Open the vault in `data_dir`, creating the database and loading
    /// `.lockvault.toml` if present.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let settings = Settings::load(data_dir)?;
        let storage = Storage::open(&settings.db_path(data_dir))?;
        Ok(Self::with_storage(storage, settings))
    }

    /// Build a vault over an existing storage handle (used by tests
    /// with in-memory databases).
    pub fn with_storage(storage: Storage, settings: Settings) -> Self {
        Self {
            storage,
            sessions: SessionRegistry::new(),
            settings,
        }
    }

    // ------------------------------------------------------------------
    // Accounts and sessions
    // ------------------------------------------------------------------

    /// Register a new account.  Does not open a session.
    pub fn register(&self, email: &str, password: &str) -> Result<i64> {
        auth::register(&self.storage, email, password, &self.settings.kdf_params())
    }

    /// Authenticate and open a session; the derived key is held by the
    /// registry until logout or expiry.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<(String, Profile)> {
        auth::authenticate(
            &self.storage,
            &self.sessions,
            email,
            password,
            self.settings.session_ttl(),
        )
    }

    /// Who this token belongs to.
    pub fn get_profile(&self, token: &str) -> Result<Profile> {
        self.sessions.profile(token)
    }

    /// End the session and destroy its key.
    pub fn logout(&self, token: &str) {
        auth::logout(&self.sessions, token);
    }

    // ------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------

    pub fn create_credential(&self, token: &str, new: &NewCredential) -> Result<CredentialRecord> {
        self.sessions.with_key(token, |profile, key| {
            CredentialVault::new(&self.storage).create(profile.user_id, key, new)
        })?
    }

    pub fn list_credentials(&self, token: &str) -> Result<Vec<CredentialMetadata>> {
        let profile = self.sessions.profile(token)?;
        CredentialVault::new(&self.storage).list(profile.user_id)
    }

    pub fn update_credential(
        &self,
        token: &str,
        id: i64,
        update: &CredentialUpdate,
    ) -> Result<CredentialRecord> {
        self.sessions.with_key(token, |profile, key| {
            CredentialVault::new(&self.storage).update(profile.user_id, key, id, update)
        })?
    }

    pub fn delete_credential(&self, token: &str, id: i64) -> Result<()> {
        let profile = self.sessions.profile(token)?;
        CredentialVault::new(&self.storage).delete(profile.user_id, id)
    }

    /// Decrypt one credential's secret for exactly this call.
    pub fn decrypt_credential(
        &self,
        token: &str,
        id: i64,
        key_source: KeySource<'_>,
    ) -> Result<Zeroizing<String>> {
        match key_source {
            KeySource::Session => self.sessions.with_key(token, |profile, key| {
                CredentialVault::new(&self.storage).decrypt(profile.user_id, key, id)
            })?,
            KeySource::MasterPassword(password) => {
                let profile = self.sessions.profile(token)?;
                let key = self.rederive_key(&profile, password)?;
                CredentialVault::new(&self.storage).decrypt(profile.user_id, &key, id)
            }
        }
    }

    /// Re-derive the encryption key from a supplied master password,
    /// verifying it against the stored verifier first.
    ///
    /// A wrong password surfaces as `DecryptionFailed` — callers must
    /// not be able to tell it apart from a corrupted record.
    fn rederive_key(&self, profile: &Profile, password: &str) -> Result<crate::crypto::SessionKey> {
        let user = self
            .storage
            .find_user_by_email(&profile.email)?
            .ok_or(LockVaultError::Unauthenticated)?;

        let mut master_secret =
            derive_master_secret(password.as_bytes(), &user.salt, &user.kdf_params)
                .map_err(|_| LockVaultError::DecryptionFailed)?;
        let derived = split_master_secret(&master_secret)?;
        master_secret.zeroize();

        let stored = Verifier::from_slice(&user.verifier)?;
        if !stored.matches(&derived.verifier) {
            return Err(LockVaultError::DecryptionFailed);
        }
        Ok(derived.key)
    }
}
