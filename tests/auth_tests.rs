//! Integration tests for the account lifecycle through the `Vault`
//! service: registration, login, sessions, logout.
//!
//! Tests run against an in-memory database with reduced Argon2 cost.

use lockvault::config::Settings;
use lockvault::errors::LockVaultError;
use lockvault::service::Vault;
use lockvault::storage::Storage;

/// A vault over an in-memory database with fast KDF settings.
fn test_vault() -> Vault {
    let settings = Settings {
        argon2_memory_kib: 8_192,
        argon2_iterations: 1,
        argon2_parallelism: 1,
        ..Settings::default()
    };
    let storage = Storage::open_in_memory().expect("in-memory storage");
    Vault::with_storage(storage, settings)
}

#[test]
fn register_then_authenticate() {
    let vault = test_vault();

    let user_id = vault.register("alice@example.com", "Abc12345!").unwrap();
    assert!(user_id > 0);

    let (token, profile) = vault.authenticate("alice@example.com", "Abc12345!").unwrap();
    assert_eq!(profile.user_id, user_id);
    assert_eq!(profile.email, "alice@example.com");
    assert!(!token.is_empty());

    // The token resolves back to the same profile.
    let looked_up = vault.get_profile(&token).unwrap();
    assert_eq!(looked_up.user_id, user_id);
}

#[test]
fn register_rejects_invalid_email() {
    let vault = test_vault();
    let err = vault.register("not-an-email", "Abc12345!").unwrap_err();
    assert!(matches!(err, LockVaultError::Validation(_)));
}

#[test]
fn register_rejects_weak_password() {
    let vault = test_vault();
    // No symbol.
    let err = vault.register("bob@example.com", "Abc123456").unwrap_err();
    assert!(matches!(err, LockVaultError::Validation(_)));
}

#[test]
fn duplicate_email_is_rejected() {
    let vault = test_vault();
    vault.register("carol@example.com", "Abc12345!").unwrap();

    let err = vault.register("carol@example.com", "Xyz98765?").unwrap_err();
    assert!(matches!(err, LockVaultError::EmailTaken));
}

#[test]
fn wrong_password_is_rejected() {
    let vault = test_vault();
    vault.register("dave@example.com", "Abc12345!").unwrap();

    let err = vault
        .authenticate("dave@example.com", "Wrong123!")
        .unwrap_err();
    assert!(matches!(err, LockVaultError::InvalidCredentials));
}

#[test]
fn unknown_email_is_indistinguishable_from_wrong_password() {
    let vault = test_vault();
    let err = vault
        .authenticate("nobody@example.com", "Abc12345!")
        .unwrap_err();
    assert!(matches!(err, LockVaultError::InvalidCredentials));
}

#[test]
fn logout_invalidates_the_token() {
    let vault = test_vault();
    vault.register("erin@example.com", "Abc12345!").unwrap();
    let (token, _) = vault.authenticate("erin@example.com", "Abc12345!").unwrap();

    vault.logout(&token);

    let err = vault.get_profile(&token).unwrap_err();
    assert!(matches!(err, LockVaultError::Unauthenticated));
}

#[test]
fn logout_is_safe_on_unknown_tokens() {
    let vault = test_vault();
    vault.logout("no-such-token");
    vault.logout("");
}

#[test]
fn two_logins_get_distinct_tokens() {
    let vault = test_vault();
    vault.register("frank@example.com", "Abc12345!").unwrap();

    let (t1, _) = vault.authenticate("frank@example.com", "Abc12345!").unwrap();
    let (t2, _) = vault.authenticate("frank@example.com", "Abc12345!").unwrap();
    assert_ne!(t1, t2);

    // Ending one session leaves the other usable.
    vault.logout(&t1);
    assert!(vault.get_profile(&t2).is_ok());
}
