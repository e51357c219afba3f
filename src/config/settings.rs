use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{LockVaultError, Result};

/// Vault configuration, loaded from `.lockvault.toml` in the data
/// directory.
///
/// Every field has a sensible default so LockVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// File name of the vault database inside the data directory.
    #[serde(default = "default_database")]
    pub database: String,

    /// How long a session (and its held key) stays valid, in minutes.
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_database() -> String {
    "lockvault.db".to_string()
}

fn default_session_ttl_minutes() -> i64 {
    30
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: default_database(),
            session_ttl_minutes: default_session_ttl_minutes(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the data directory.
    const FILE_NAME: &'static str = ".lockvault.toml";

    /// Load settings from `<data_dir>/.lockvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            LockVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path to the vault database.
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn kdf_params(&self) -> crate::crypto::KdfParams {
        crate::crypto::KdfParams {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Session lifetime as a chrono duration.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_ttl_minutes.max(1))
    }
}

// ── Tests ────────────────────────────────────────────────────────────
