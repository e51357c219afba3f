//! CLI module — Clap argument parser, output helpers, and command
//! implementations.
//!
//! The CLI is a thin collaborator over the `Vault` service: each
//! authenticated command logs in, runs exactly one operation, and logs
//! out before exiting, so no derived key outlives the process.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::auth::validate_master_password;
use crate::errors::{LockVaultError, Result};
use crate::generator::strength_score;
use crate::service::Vault;
use crate::session::Profile;

/// LockVault CLI: master-password credential vault.
#[derive(Parser)]
#[command(
    name = "lockvault",
    about = "Encrypted credential vault locked by a master password",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory holding the vault database (default: .lockvault)
    #[arg(long, default_value = ".lockvault", global = true)]
    pub data_dir: String,

    /// Account email (or set LOCKVAULT_EMAIL)
    #[arg(short, long, global = true, env = "LOCKVAULT_EMAIL")]
    pub email: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Register a new account
    Register,

    /// Add a credential
    Add {
        /// Display title (e.g. "Mail")
        title: String,

        /// Login username for the stored account
        #[arg(short, long)]
        username: Option<String>,

        /// Website the credential belongs to
        #[arg(short, long)]
        website: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List stored credentials (metadata only, nothing is decrypted)
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Decrypt and print one credential's secret
    Show {
        /// Credential id (see `list`)
        id: i64,

        /// Re-confirm the master password instead of using the session
        #[arg(long)]
        reconfirm: bool,
    },

    /// Update a credential (re-encrypts the secret if changed)
    Update {
        /// Credential id (see `list`)
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New username
        #[arg(long)]
        username: Option<String>,

        /// Prompt for a new secret
        #[arg(long)]
        secret: bool,

        /// New website
        #[arg(long)]
        website: Option<String>,

        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a credential
    Delete {
        /// Credential id (see `list`)
        id: i64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Password length
        #[arg(short, long, default_value = "16")]
        length: usize,
    },

    /// View the audit log of vault operations
    #[cfg(feature = "audit-log")]
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,

        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the data directory relative to the working directory.
pub fn data_dir(cli: &Cli) -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(&cli.data_dir))
}

/// Open the vault service for this invocation.
pub fn open_vault(cli: &Cli) -> Result<Vault> {
    Vault::open(&data_dir(cli)?)
}

/// Get the account email from `--email`, `LOCKVAULT_EMAIL`, or a prompt.
pub fn require_email(cli: &Cli) -> Result<String> {
    if let Some(ref email) = cli.email {
        return Ok(email.clone());
    }

    dialoguer::Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(|e| LockVaultError::CommandFailed(format!("email prompt: {e}")))
}

/// Get the master password, trying in order:
/// 1. `LOCKVAULT_PASSWORD` env var (scripts/CI)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("LOCKVAULT_PASSWORD") {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| LockVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by
/// `register`).  Shows the strength meter and enforces the policy
/// before accepting.
///
/// Also respects `LOCKVAULT_PASSWORD` for scripted usage.
pub fn prompt_new_master_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var("LOCKVAULT_PASSWORD") {
        if !pw.is_empty() {
            validate_master_password(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let pw = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose a master password")
                .interact()
                .map_err(|e| LockVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if let Err(e) = validate_master_password(&pw) {
            output::warning(&e.to_string());
            continue;
        }
        output::info(&format!(
            "Strength: {}",
            output::strength_meter(strength_score(&pw))
        ));

        let confirm = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Confirm master password")
                .interact()
                .map_err(|e| LockVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if *pw != *confirm {
            output::warning(&LockVaultError::PasswordMismatch.to_string());
            continue;
        }

        return Ok(pw);
    }
}

/// Authenticate for one command and return the session token.
///
/// The token (and the key held behind it) dies with the process; the
/// caller should still `vault.logout(&token)` when done.
pub fn login(cli: &Cli, vault: &Vault) -> Result<(String, Profile)> {
    let email = require_email(cli)?;
    let password = prompt_master_password()?;
    vault.authenticate(&email, &password)
}
