use thiserror::Error;

/// All errors that can occur in LockVault.
#[derive(Debug, Error)]
pub enum LockVaultError {
    // --- Input validation ---
    #[error("Validation failed: {0}")]
    Validation(String),

    // --- Account errors ---
    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not authenticated — session missing or expired")]
    Unauthenticated,

    // --- Credential errors ---
    #[error("Credential not found")]
    CredentialNotFound,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong master password or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Storage errors ---
    #[error("Storage error: {0}")]
    Storage(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    AuditError(String),
}

/// Convenience type alias for LockVault results.
pub type Result<T> = std::result::Result<T, LockVaultError>;
