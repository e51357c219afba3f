//! `lockvault show` — decrypt and print a single credential's secret.

use crate::cli::{login, open_vault, prompt_master_password, Cli};
use crate::errors::Result;
use crate::service::KeySource;

/// Execute the `show` command.
///
/// With `--reconfirm` the master password is asked for again and the
/// key is re-derived for this one decrypt instead of using the session.
pub fn execute(cli: &Cli, id: i64, reconfirm: bool) -> Result<()> {
    let vault = open_vault(cli)?;
    let (token, profile) = login(cli, &vault)?;

    let result = if reconfirm {
        let password = prompt_master_password()?;
        vault.decrypt_credential(&token, id, KeySource::MasterPassword(&password))
    } else {
        vault.decrypt_credential(&token, id, KeySource::Session)
    };
    vault.logout(&token);
    let secret = result?;

    #[cfg(feature = "audit-log")]
    crate::audit::log_audit(
        &crate::cli::data_dir(cli)?,
        "show",
        &profile.email,
        Some(id),
        None,
    );
    #[cfg(not(feature = "audit-log"))]
    let _ = &profile;

    // The decrypted secret goes to stdout and nowhere else.
    println!("{}", &*secret);

    Ok(())
}
