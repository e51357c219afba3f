//! `lockvault generate` — print a fresh random password.
//!
//! Works without an account; the generator talks only to the OS
//! CSPRNG.

use crate::cli::output;
use crate::errors::Result;
use crate::generator::{generate_password, strength_score};

/// Execute the `generate` command.
pub fn execute(length: usize) -> Result<()> {
    let password = generate_password(length)?;

    println!("{password}");
    output::info(&format!(
        "Strength: {}",
        output::strength_meter(strength_score(&password))
    ));

    Ok(())
}
