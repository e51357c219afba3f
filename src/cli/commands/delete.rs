//! `lockvault delete` — remove a stored credential.

use crate::cli::{login, open_vault, output, Cli};
use crate::errors::{LockVaultError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    if !force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete credential {id}? This cannot be undone"))
            .default(false)
            .interact()
            .map_err(|e| LockVaultError::CommandFailed(format!("confirm prompt: {e}")))?;
        if !confirmed {
            return Err(LockVaultError::UserCancelled);
        }
    }

    let vault = open_vault(cli)?;
    let (token, profile) = login(cli, &vault)?;

    let result = vault.delete_credential(&token, id);
    vault.logout(&token);
    result?;

    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(
        &crate::cli::data_dir(cli)?,
        "delete",
        &profile.email,
        Some(id),
        None,
    );
    #[cfg(not(feature = "audit-log"))]
    let _ = &profile;

    output::success(&format!("Credential {id} deleted."));

    Ok(())
}
