//! `lockvault register` — create a new account.

use crate::cli::{open_vault, output, prompt_new_master_password, require_email, Cli};
use crate::errors::Result;

/// Execute the `register` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    let email = require_email(cli)?;
    let password = prompt_new_master_password()?;

    vault.register(&email, &password)?;

    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(&crate::cli::data_dir(cli)?, "register", &email, None, None);

    output::success(&format!("Account '{email}' registered."));
    output::tip("Add your first credential: lockvault add <TITLE>");
    output::warning("There is no master password recovery — losing it means losing your secrets.");

    Ok(())
}
