//! SQLite persistence for users and credential records.
//!
//! Two tables hold everything the core is allowed to persist:
//!
//! - `users`: email, per-user salt, login verifier, and the Argon2
//!   parameters the account was created with.  Never the password or a
//!   derived key.
//! - `credentials`: owner-scoped rows whose `secret` column is the
//!   opaque AEAD blob.  Every query filters by `owner_id`, so a record
//!   belonging to someone else is indistinguishable from one that does
//!   not exist.
//!
//! The connection sits behind a mutex: concurrent updates to the same
//! record serialize, and a re-encryption can never race a read of the
//! same blob.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::crypto::KdfParams;
use crate::errors::{LockVaultError, Result};
use crate::vault::record::{CredentialMetadata, CredentialRecord};

/// One row of the `users` table.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub salt: Vec<u8>,
    pub verifier: Vec<u8>,
    pub kdf_params: KdfParams,
    pub created_at: DateTime<Utc>,
}

/// Handle to the vault database.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Open (or create) the vault database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| LockVaultError::Storage(format!("open {}: {e}", path.display())))?;

        // Restrict the database to the owning user.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        Self::init(conn)
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| LockVaultError::Storage(format!("open in-memory: {e}")))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;

             CREATE TABLE IF NOT EXISTS users (
                 id          INTEGER PRIMARY KEY AUTOINCREMENT,
                 email       TEXT NOT NULL UNIQUE,
                 salt        BLOB NOT NULL,
                 verifier    BLOB NOT NULL,
                 memory_kib  INTEGER NOT NULL,
                 iterations  INTEGER NOT NULL,
                 parallelism INTEGER NOT NULL,
                 created_at  TEXT NOT NULL
             );

             CREATE TABLE IF NOT EXISTS credentials (
                 id         INTEGER PRIMARY KEY AUTOINCREMENT,
                 owner_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                 title      TEXT NOT NULL,
                 username   TEXT NOT NULL,
                 secret     BLOB NOT NULL,
                 website    TEXT,
                 notes      TEXT,
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             );

             CREATE INDEX IF NOT EXISTS idx_credentials_owner
                 ON credentials(owner_id);",
        )
        .map_err(|e| LockVaultError::Storage(format!("schema init: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Insert a new user.  A duplicate email reports `EmailTaken`.
    pub fn insert_user(
        &self,
        email: &str,
        salt: &[u8],
        verifier: &[u8],
        kdf_params: &KdfParams,
    ) -> Result<i64> {
        let conn = self.lock();
        let now = Utc::now().to_rfc3339();

        let result = conn.execute(
            "INSERT INTO users (email, salt, verifier, memory_kib, iterations, parallelism, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                email,
                salt,
                verifier,
                kdf_params.memory_kib,
                kdf_params.iterations,
                kdf_params.parallelism,
                now
            ],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(LockVaultError::EmailTaken),
            Err(e) => Err(LockVaultError::Storage(format!("insert user: {e}"))),
        }
    }

    /// Look up a user by email.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT id, email, salt, verifier, memory_kib, iterations, parallelism, created_at
             FROM users WHERE email = ?1",
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(|e| LockVaultError::Storage(format!("find user: {e}")))
    }

    // ------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------

    /// Insert an encrypted credential and return the stored record.
    pub fn insert_credential(
        &self,
        owner_id: i64,
        title: &str,
        username: &str,
        secret_blob: &[u8],
        website: Option<&str>,
        notes: Option<&str>,
    ) -> Result<CredentialRecord> {
        let conn = self.lock();
        let now = Utc::now();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO credentials (owner_id, title, username, secret, website, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![owner_id, title, username, secret_blob, website, notes, now_str],
        )
        .map_err(|e| LockVaultError::Storage(format!("insert credential: {e}")))?;

        Ok(CredentialRecord {
            id: conn.last_insert_rowid(),
            owner_id,
            title: title.to_string(),
            username: username.to_string(),
            encrypted_secret: secret_blob.to_vec(),
            website: website.map(str::to_string),
            notes: notes.map(str::to_string),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch one credential, scoped to its owner.
    ///
    /// Returns `None` both when the id is absent and when it belongs to
    /// a different owner.
    pub fn get_credential(&self, id: i64, owner_id: i64) -> Result<Option<CredentialRecord>> {
        let conn = self.lock();
        conn.query_row(
            "SELECT id, owner_id, title, username, secret, website, notes, created_at, updated_at
             FROM credentials WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
            credential_from_row,
        )
        .optional()
        .map_err(|e| LockVaultError::Storage(format!("get credential: {e}")))
    }

    /// List metadata for all of one owner's credentials, title order.
    pub fn list_credentials(&self, owner_id: i64) -> Result<Vec<CredentialMetadata>> {
        let conn = self.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, owner_id, title, username, secret, website, notes, created_at, updated_at
                 FROM credentials WHERE owner_id = ?1
                 ORDER BY title, id",
            )
            .map_err(|e| LockVaultError::Storage(format!("list prepare: {e}")))?;

        let rows = stmt
            .query_map(params![owner_id], credential_from_row)
            .map_err(|e| LockVaultError::Storage(format!("list exec: {e}")))?;

        let mut list = Vec::new();
        for row in rows {
            let record = row.map_err(|e| LockVaultError::Storage(format!("list row: {e}")))?;
            list.push(record.metadata());
        }
        Ok(list)
    }

    /// Replace a credential row in place.  Returns `false` if no row
    /// matched (absent or not owned).
    pub fn update_credential(&self, record: &CredentialRecord) -> Result<bool> {
        let conn = self.lock();
        let affected = conn
            .execute(
                "UPDATE credentials
                 SET title = ?1, username = ?2, secret = ?3, website = ?4, notes = ?5, updated_at = ?6
                 WHERE id = ?7 AND owner_id = ?8",
                params![
                    record.title,
                    record.username,
                    record.encrypted_secret,
                    record.website,
                    record.notes,
                    record.updated_at.to_rfc3339(),
                    record.id,
                    record.owner_id
                ],
            )
            .map_err(|e| LockVaultError::Storage(format!("update credential: {e}")))?;
        Ok(affected > 0)
    }

    /// Delete a credential.  Returns `false` if no row matched.
    pub fn delete_credential(&self, id: i64, owner_id: i64) -> Result<bool> {
        let conn = self.lock();
        let affected = conn
            .execute(
                "DELETE FROM credentials WHERE id = ?1 AND owner_id = ?2",
                params![id, owner_id],
            )
            .map_err(|e| LockVaultError::Storage(format!("delete credential: {e}")))?;
        Ok(affected > 0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("storage mutex poisoned")
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    let created_at: String = row.get(7)?;
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        salt: row.get(2)?,
        verifier: row.get(3)?,
        kdf_params: KdfParams {
            memory_kib: row.get(4)?,
            iterations: row.get(5)?,
            parallelism: row.get(6)?,
        },
        created_at: parse_timestamp(&created_at),
    })
}

fn credential_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CredentialRecord> {
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;
    Ok(CredentialRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        username: row.get(3)?,
        encrypted_secret: row.get(4)?,
        website: row.get(5)?,
        notes: row.get(6)?,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    fn add_user(s: &Storage, email: &str) -> i64 {
        s.insert_user(email, &[1u8; 32], &[2u8; 32], &KdfParams::default())
            .unwrap()
    }

    #[test]
    fn insert_and_find_user() {
        let s = storage();
        let id = add_user(&s, "alice@example.com");

        let row = s.find_user_by_email("alice@example.com").unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.salt, vec![1u8; 32]);
        assert_eq!(row.kdf_params, KdfParams::default());

        assert!(s.find_user_by_email("bob@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let s = storage();
        add_user(&s, "alice@example.com");
        let err = s
            .insert_user(
                "alice@example.com",
                &[9u8; 32],
                &[9u8; 32],
                &KdfParams::default(),
            )
            .unwrap_err();
        assert!(matches!(err, LockVaultError::EmailTaken));
    }

    #[test]
    fn credential_crud_roundtrip() {
        let s = storage();
        let owner = add_user(&s, "alice@example.com");

        let record = s
            .insert_credential(owner, "Mail", "alice", b"blob", Some("mail.example.com"), None)
            .unwrap();
        assert_eq!(record.owner_id, owner);

        let fetched = s.get_credential(record.id, owner).unwrap().unwrap();
        assert_eq!(fetched.encrypted_secret, b"blob");
        assert_eq!(fetched.website.as_deref(), Some("mail.example.com"));

        assert!(s.delete_credential(record.id, owner).unwrap());
        assert!(!s.delete_credential(record.id, owner).unwrap());
        assert!(s.get_credential(record.id, owner).unwrap().is_none());
    }

    #[test]
    fn credentials_are_owner_scoped() {
        let s = storage();
        let alice = add_user(&s, "alice@example.com");
        let bob = add_user(&s, "bob@example.com");

        let record = s
            .insert_credential(alice, "Mail", "alice", b"blob", None, None)
            .unwrap();

        // Bob cannot see, update, or delete Alice's record.
        assert!(s.get_credential(record.id, bob).unwrap().is_none());
        assert!(!s.delete_credential(record.id, bob).unwrap());
        assert_eq!(s.list_credentials(bob).unwrap().len(), 0);
        assert_eq!(s.list_credentials(alice).unwrap().len(), 1);
    }

    #[test]
    fn list_is_title_ordered_metadata() {
        let s = storage();
        let owner = add_user(&s, "alice@example.com");
        s.insert_credential(owner, "Zeta", "z", b"b1", None, None)
            .unwrap();
        s.insert_credential(owner, "Alpha", "a", b"b2", None, None)
            .unwrap();

        let list = s.list_credentials(owner).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "Alpha");
        assert_eq!(list[1].title, "Zeta");
    }
}
