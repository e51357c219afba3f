//! Credential vault operations.
//!
//! `CredentialVault` wraps the storage layer and the crypto layer so
//! the service facade can work with simple method calls.  Secrets are
//! sealed with the caller's session key before they ever reach storage
//! and unsealed only inside `decrypt`, one record per call.

use chrono::Utc;
use zeroize::Zeroizing;

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::SessionKey;
use crate::errors::{LockVaultError, Result};
use crate::storage::Storage;

use super::record::{CredentialMetadata, CredentialRecord, CredentialUpdate, NewCredential};

/// Longest accepted title/username (characters).
const MAX_FIELD_LEN: usize = 256;

/// Owner-scoped view over the credential store.
///
/// Constructed per operation; holds no key material of its own.
pub struct CredentialVault<'a> {
    storage: &'a Storage,
}

impl<'a> CredentialVault<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Encrypt and persist a new credential.
    pub fn create(
        &self,
        owner_id: i64,
        key: &SessionKey,
        new: &NewCredential,
    ) -> Result<CredentialRecord> {
        validate_field("title", &new.title)?;
        validate_field("username", &new.username)?;
        if new.secret.is_empty() {
            return Err(LockVaultError::Validation("secret cannot be empty".into()));
        }

        let blob = encrypt(key.as_bytes(), new.secret.as_bytes())?;

        self.storage.insert_credential(
            owner_id,
            &new.title,
            &new.username,
            &blob,
            new.website.as_deref(),
            new.notes.as_deref(),
        )
    }

    /// List metadata for all of the owner's credentials.
    ///
    /// Metadata only — nothing is decrypted here.
    pub fn list(&self, owner_id: i64) -> Result<Vec<CredentialMetadata>> {
        self.storage.list_credentials(owner_id)
    }

    /// Apply a partial update; a changed secret is re-encrypted with a
    /// fresh nonce.
    pub fn update(
        &self,
        owner_id: i64,
        key: &SessionKey,
        id: i64,
        update: &CredentialUpdate,
    ) -> Result<CredentialRecord> {
        if update.is_empty() {
            return Err(LockVaultError::Validation(
                "update must change at least one field".into(),
            ));
        }

        let mut record = self
            .storage
            .get_credential(id, owner_id)?
            .ok_or(LockVaultError::CredentialNotFound)?;

        if let Some(ref title) = update.title {
            validate_field("title", title)?;
            record.title = title.clone();
        }
        if let Some(ref username) = update.username {
            validate_field("username", username)?;
            record.username = username.clone();
        }
        if let Some(ref secret) = update.secret {
            if secret.is_empty() {
                return Err(LockVaultError::Validation("secret cannot be empty".into()));
            }
            record.encrypted_secret = encrypt(key.as_bytes(), secret.as_bytes())?;
        }
        if let Some(ref website) = update.website {
            record.website = Some(website.clone());
        }
        if let Some(ref notes) = update.notes {
            record.notes = Some(notes.clone());
        }
        record.updated_at = Utc::now();

        // The row can vanish between the read and the write (concurrent
        // delete); surface that as not-found, same as the read path.
        if !self.storage.update_credential(&record)? {
            return Err(LockVaultError::CredentialNotFound);
        }
        Ok(record)
    }

    /// Delete a credential.  A repeat delete legitimately reports
    /// `CredentialNotFound`.
    pub fn delete(&self, owner_id: i64, id: i64) -> Result<()> {
        if !self.storage.delete_credential(id, owner_id)? {
            return Err(LockVaultError::CredentialNotFound);
        }
        Ok(())
    }

    /// Decrypt one credential's secret for exactly this call.
    ///
    /// The plaintext comes back in a zero-on-drop buffer and is never
    /// cached anywhere.
    pub fn decrypt(&self, owner_id: i64, key: &SessionKey, id: i64) -> Result<Zeroizing<String>> {
        let record = self
            .storage
            .get_credential(id, owner_id)?
            .ok_or(LockVaultError::CredentialNotFound)?;

        let plaintext_bytes = decrypt(key.as_bytes(), &record.encrypted_secret)?;

        // On invalid UTF-8, wipe the bytes inside the error before
        // discarding them.
        String::from_utf8(plaintext_bytes)
            .map(Zeroizing::new)
            .map_err(|e| {
                let mut bad_bytes = Zeroizing::new(e.into_bytes());
                bad_bytes.clear();
                LockVaultError::SerializationError("secret is not valid UTF-8".to_string())
            })
    }
}

/// Require a non-empty, bounded text field.
fn validate_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LockVaultError::Validation(format!(
            "{name} cannot be empty"
        )));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(LockVaultError::Validation(format!(
            "{name} cannot exceed {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KdfParams;

    fn setup() -> (Storage, i64, SessionKey) {
        let storage = Storage::open_in_memory().unwrap();
        let owner = storage
            .insert_user("alice@example.com", &[1u8; 32], &[2u8; 32], &KdfParams::default())
            .unwrap();
        (storage, owner, SessionKey::new([0x42u8; 32]))
    }

    fn mail_credential() -> NewCredential {
        NewCredential {
            title: "Mail".into(),
            username: "alice".into(),
            secret: "S3cret!".into(),
            website: Some("mail.example.com".into()),
            notes: None,
        }
    }

    #[test]
    fn create_then_decrypt_roundtrip() {
        let (storage, owner, key) = setup();
        let vault = CredentialVault::new(&storage);

        let record = vault.create(owner, &key, &mail_credential()).unwrap();
        assert_ne!(record.encrypted_secret, b"S3cret!".to_vec());

        let secret = vault.decrypt(owner, &key, record.id).unwrap();
        assert_eq!(secret.as_str(), "S3cret!");
    }

    #[test]
    fn decrypt_with_wrong_key_fails_closed() {
        let (storage, owner, key) = setup();
        let vault = CredentialVault::new(&storage);
        let record = vault.create(owner, &key, &mail_credential()).unwrap();

        let wrong = SessionKey::new([0x43u8; 32]);
        let err = vault.decrypt(owner, &wrong, record.id).unwrap_err();
        assert!(matches!(err, LockVaultError::DecryptionFailed));
    }

    #[test]
    fn empty_fields_are_rejected_before_crypto() {
        let (storage, owner, key) = setup();
        let vault = CredentialVault::new(&storage);

        let mut new = mail_credential();
        new.title = "  ".into();
        assert!(matches!(
            vault.create(owner, &key, &new).unwrap_err(),
            LockVaultError::Validation(_)
        ));

        let mut new = mail_credential();
        new.secret = String::new();
        assert!(matches!(
            vault.create(owner, &key, &new).unwrap_err(),
            LockVaultError::Validation(_)
        ));
    }

    #[test]
    fn update_secret_reencrypts_with_fresh_nonce() {
        let (storage, owner, key) = setup();
        let vault = CredentialVault::new(&storage);
        let record = vault.create(owner, &key, &mail_credential()).unwrap();

        let update = CredentialUpdate {
            secret: Some("S3cret!".into()), // same plaintext
            ..CredentialUpdate::default()
        };
        let updated = vault.update(owner, &key, record.id, &update).unwrap();

        // Same plaintext, new nonce — blobs must differ.
        assert_ne!(updated.encrypted_secret, record.encrypted_secret);
        let secret = vault.decrypt(owner, &key, record.id).unwrap();
        assert_eq!(secret.as_str(), "S3cret!");
    }

    #[test]
    fn update_keeps_unchanged_fields() {
        let (storage, owner, key) = setup();
        let vault = CredentialVault::new(&storage);
        let record = vault.create(owner, &key, &mail_credential()).unwrap();

        let update = CredentialUpdate {
            title: Some("Mail (work)".into()),
            ..CredentialUpdate::default()
        };
        let updated = vault.update(owner, &key, record.id, &update).unwrap();

        assert_eq!(updated.title, "Mail (work)");
        assert_eq!(updated.username, "alice");
        // Secret untouched, so the stored blob is unchanged.
        assert_eq!(updated.encrypted_secret, record.encrypted_secret);
    }

    #[test]
    fn delete_then_decrypt_is_not_found() {
        let (storage, owner, key) = setup();
        let vault = CredentialVault::new(&storage);
        let record = vault.create(owner, &key, &mail_credential()).unwrap();

        vault.delete(owner, record.id).unwrap();
        assert!(matches!(
            vault.decrypt(owner, &key, record.id).unwrap_err(),
            LockVaultError::CredentialNotFound
        ));
        // Second delete 404s as well.
        assert!(matches!(
            vault.delete(owner, record.id).unwrap_err(),
            LockVaultError::CredentialNotFound
        ));
    }

    #[test]
    fn list_never_exposes_ciphertext() {
        let (storage, owner, key) = setup();
        let vault = CredentialVault::new(&storage);
        vault.create(owner, &key, &mail_credential()).unwrap();

        let list = vault.list(owner).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "Mail");
        // CredentialMetadata has no encrypted_secret field at all; the
        // JSON form must not leak one either.
        let json = serde_json::to_value(&list[0]).unwrap();
        assert!(json.get("encrypted_secret").is_none());
        assert!(json.get("secret").is_none());
    }
}
