//! Password generation and strength estimation.
//!
//! Generation draws every byte from the OS CSPRNG and guarantees at
//! least one character from each of the four classes (uppercase,
//! lowercase, digit, symbol), then Fisher-Yates shuffles so the
//! guaranteed characters do not sit at predictable positions.  Index
//! picks use rejection sampling, so no charset position is favored.

use rand::RngCore;

use crate::errors::{LockVaultError, Result};

/// Default generated password length.
pub const DEFAULT_PASSWORD_LEN: usize = 16;

/// Shortest password we will generate (one per character class).
const MIN_GENERATED_LEN: usize = 4;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Generate a random password of `len` characters.
///
/// Always contains at least one uppercase letter, one lowercase
/// letter, one digit, and one symbol.
pub fn generate_password(len: usize) -> Result<String> {
    if len < MIN_GENERATED_LEN {
        return Err(LockVaultError::Validation(format!(
            "generated password length must be at least {MIN_GENERATED_LEN}"
        )));
    }
    if len > 256 {
        return Err(LockVaultError::Validation(
            "generated password length cannot exceed 256".into(),
        ));
    }

    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

    // One guaranteed pick per class, the rest from the full set.
    let mut chars: Vec<u8> = Vec::with_capacity(len);
    chars.push(pick(UPPERCASE));
    chars.push(pick(LOWERCASE));
    chars.push(pick(DIGITS));
    chars.push(pick(SYMBOLS));
    while chars.len() < len {
        chars.push(pick(&all));
    }

    // Fisher-Yates so the class-guaranteed characters are not always
    // the first four.
    for i in (1..chars.len()).rev() {
        let j = random_index(i + 1);
        chars.swap(i, j);
    }

    String::from_utf8(chars)
        .map_err(|_| LockVaultError::CommandFailed("generated password is not ASCII".into()))
}

/// Pick one byte from a charset, uniformly.
fn pick(charset: &[u8]) -> u8 {
    charset[random_index(charset.len())]
}

/// Uniform index in `0..bound` from OS randomness.
///
/// Rejection sampling: discard bytes in the biased tail of the 0..=255
/// range instead of taking a modulo that would favor low indices.
fn random_index(bound: usize) -> usize {
    debug_assert!(bound > 0 && bound <= 256);
    let zone = 256 - (256 % bound);
    let mut byte = [0u8; 1];
    loop {
        rand::rngs::OsRng.fill_bytes(&mut byte);
        if (byte[0] as usize) < zone {
            return byte[0] as usize % bound;
        }
    }
}

/// Score a password's strength from 0 (empty) to 5 (very strong).
///
/// One point each for: length >= 8, length >= 12, contains uppercase,
/// contains lowercase, contains a digit, contains a symbol — capped at
/// 5.  Monotonic: growing the password or adding a character class
/// never lowers the score.
pub fn strength_score(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }

    let mut score = 0u8;
    if password.len() >= 8 {
        score += 1;
    }
    if password.len() >= 12 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }
    score.min(5)
}

/// Human label for a strength score.
pub fn strength_label(score: u8) -> &'static str {
    match score {
        0 => "Very Weak",
        1 => "Weak",
        2 => "Fair",
        3 => "Good",
        4 => "Strong",
        _ => "Very Strong",
    }
}
