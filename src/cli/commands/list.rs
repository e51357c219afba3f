//! `lockvault list` — list credential metadata.
//!
//! Listing never decrypts anything; the ciphertext stays in storage.

use crate::cli::{login, open_vault, output, Cli};
use crate::errors::{LockVaultError, Result};

/// Execute the `list` command.
pub fn execute(cli: &Cli, json: bool) -> Result<()> {
    let vault = open_vault(cli)?;
    let (token, _profile) = login(cli, &vault)?;

    let result = vault.list_credentials(&token);
    vault.logout(&token);
    let credentials = result?;

    if json {
        let rendered = serde_json::to_string_pretty(&credentials)
            .map_err(|e| LockVaultError::SerializationError(e.to_string()))?;
        println!("{rendered}");
    } else {
        output::print_credentials_table(&credentials);
    }

    Ok(())
}
