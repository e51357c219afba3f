//! `lockvault add` — encrypt and store a new credential.

use std::io::{self, IsTerminal, Read};

use crate::cli::{login, open_vault, output, Cli};
use crate::errors::{LockVaultError, Result};
use crate::vault::NewCredential;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    title: &str,
    username: Option<&str>,
    website: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let vault = open_vault(cli)?;
    let (token, profile) = login(cli, &vault)?;

    let username = match username {
        Some(u) => u.to_string(),
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| LockVaultError::CommandFailed(format!("username prompt: {e}")))?,
    };

    // Secret comes from a pipe or a hidden prompt, never from argv.
    let secret = if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        dialoguer::Password::new()
            .with_prompt(format!("Secret for '{title}'"))
            .interact()
            .map_err(|e| LockVaultError::CommandFailed(format!("secret prompt: {e}")))?
    };

    let new = NewCredential {
        title: title.to_string(),
        username,
        secret,
        website: website.map(str::to_string),
        notes: notes.map(str::to_string),
    };

    let result = vault.create_credential(&token, &new);
    vault.logout(&token);
    let record = result?;

    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(
        &crate::cli::data_dir(cli)?,
        "add",
        &profile.email,
        Some(record.id),
        Some(&record.title),
    );
    #[cfg(not(feature = "audit-log"))]
    let _ = &profile;

    output::success(&format!(
        "Credential '{}' stored (id {}).",
        record.title, record.id
    ));

    Ok(())
}
