//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (register, login, add,
//! delete, etc.) in a local SQLite database at `<data_dir>/audit.db`.
//! Entries carry the acting account's email and an optional detail
//! string; never any secret material or master password.
//!
//! Designed for graceful degradation: if the database can't be opened
//! or written to, operations silently continue without logging.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::errors::{LockVaultError, Result};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub email: String,
    pub credential_id: Option<i64>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<data_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(data_dir: &Path) -> Option<Self> {
        let db_path = data_dir.join("audit.db");
        let conn = Connection::open(&db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp     TEXT NOT NULL,
                operation     TEXT NOT NULL,
                email         TEXT NOT NULL,
                credential_id INTEGER,
                details       TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(
        &self,
        operation: &str,
        email: &str,
        credential_id: Option<i64>,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, email, credential_id, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![now, operation, email, credential_id, details],
        );
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, email, credential_id, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![
                    Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                    Box::new(limit_i64),
                ],
            ),
            None => (
                "SELECT id, timestamp, operation, email, credential_id, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
            ),
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| LockVaultError::AuditError(format!("query prepare: {e}")))?;

        let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    email: row.get(3)?,
                    credential_id: row.get(4)?,
                    details: row.get(5)?,
                })
            })
            .map_err(|e| LockVaultError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| LockVaultError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }
}

/// Convenience helper: log an audit event for a data directory.
///
/// Opens the audit database, logs the event, and silently ignores any
/// errors.  This is safe to call from any command — it never fails the
/// parent operation.
pub fn log_audit(
    data_dir: &Path,
    op: &str,
    email: &str,
    credential_id: Option<i64>,
    details: Option<&str>,
) {
    if let Some(audit) = AuditLog::open(data_dir) {
        audit.log(op, email, credential_id, details);
    }
}
