//! `lockvault update` — change fields of a stored credential.

use crate::cli::{login, open_vault, output, Cli};
use crate::errors::{LockVaultError, Result};
use crate::vault::CredentialUpdate;

/// Execute the `update` command.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    cli: &Cli,
    id: i64,
    title: Option<&str>,
    username: Option<&str>,
    new_secret: bool,
    website: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    let vault = open_vault(cli)?;
    let (token, profile) = login(cli, &vault)?;

    let secret = if new_secret {
        Some(
            dialoguer::Password::new()
                .with_prompt("New secret")
                .interact()
                .map_err(|e| LockVaultError::CommandFailed(format!("secret prompt: {e}")))?,
        )
    } else {
        None
    };

    let update = CredentialUpdate {
        title: title.map(str::to_string),
        username: username.map(str::to_string),
        secret,
        website: website.map(str::to_string),
        notes: notes.map(str::to_string),
    };

    let result = vault.update_credential(&token, id, &update);
    vault.logout(&token);
    let record = result?;

    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(
        &crate::cli::data_dir(cli)?,
        "update",
        &profile.email,
        Some(record.id),
        Some(&record.title),
    );
    #[cfg(not(feature = "audit-log"))]
    let _ = &profile;

    output::success(&format!("Credential '{}' updated.", record.title));

    Ok(())
}
