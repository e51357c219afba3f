//! Registration and login.
//!
//! Registration stores `{email, salt, verifier, kdf params}` and nothing
//! else — the password and the freshly derived key are dropped before
//! the function returns.  Login re-derives the verifier from the
//! supplied password, compares it in constant time, and on success
//! re-derives the encryption key and parks it in the session registry.

use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;
use zeroize::Zeroize;

use crate::crypto::{derive_master_secret, generate_salt, split_master_secret, KdfParams, Verifier};
use crate::errors::{LockVaultError, Result};
use crate::session::{Profile, SessionRegistry};
use crate::storage::Storage;

/// Minimum master password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validate email syntax.  Deliberately loose — one `@`, a dot in the
/// domain, no whitespace.
pub fn validate_email(email: &str) -> Result<()> {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
    });

    if email.is_empty() || email.len() > 254 || !re.is_match(email) {
        return Err(LockVaultError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Enforce the master-password policy: at least 8 characters and at
/// least one uppercase letter, one lowercase letter, one digit, and
/// one symbol.
pub fn validate_master_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(LockVaultError::Validation(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if !(has_upper && has_lower && has_digit && has_symbol) {
        return Err(LockVaultError::Validation(
            "master password must include uppercase, lowercase, digit, and symbol characters"
                .into(),
        ));
    }
    Ok(())
}

/// Register a new account and return its user id.
///
/// Persists only the salt and the verifier; the derived key is dropped
/// (zeroized) on the way out.
pub fn register(
    storage: &Storage,
    email: &str,
    password: &str,
    params: &KdfParams,
) -> Result<i64> {
    let email = normalize_email(email);
    validate_email(&email)?;
    validate_master_password(password)?;

    let salt = generate_salt();
    let mut master_secret = derive_master_secret(password.as_bytes(), &salt, params)?;
    let derived = split_master_secret(&master_secret)?;
    master_secret.zeroize();

    // `derived.key` drops (and zeroizes) here — registration never
    // opens a session by itself.
    storage.insert_user(&email, &salt, derived.verifier.as_bytes(), params)
}

/// Authenticate and open a session.
///
/// Unknown email and wrong password are indistinguishable to callers.
pub fn authenticate(
    storage: &Storage,
    sessions: &SessionRegistry,
    email: &str,
    password: &str,
    session_ttl: Duration,
) -> Result<(String, Profile)> {
    let email = normalize_email(email);

    let user = storage
        .find_user_by_email(&email)?
        .ok_or(LockVaultError::InvalidCredentials)?;

    let mut master_secret =
        derive_master_secret(password.as_bytes(), &user.salt, &user.kdf_params)
            .map_err(|_| LockVaultError::InvalidCredentials)?;
    let derived = split_master_secret(&master_secret)?;
    master_secret.zeroize();

    let stored = Verifier::from_slice(&user.verifier)?;
    if !stored.matches(&derived.verifier) {
        return Err(LockVaultError::InvalidCredentials);
    }

    let profile = Profile {
        user_id: user.id,
        email: user.email,
    };
    let token = sessions.insert(profile.clone(), derived.key, session_ttl);
    Ok((token, profile))
}

/// End a session, destroying the held key.  Safe on unknown tokens.
pub fn logout(sessions: &SessionRegistry, token: &str) {
    sessions.remove(token);
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
