// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keyward credential vault.

use thiserror::Error;

/// The primary error type used across the Keyward workspace.
///
/// Everything except [`KeywardError::Decryption`] is surfaced to the
/// interactive layer for user-visible messaging. `Decryption` is caught
/// inside the secret field adapter and converted into the legacy-plaintext
/// fallback; see `keyward-vault`'s `field` module.
#[derive(Debug, Error)]
pub enum KeywardError {
    /// No security profile exists yet. Signals first run, not a failure.
    #[error("security profile not found")]
    SecurityProfileNotFound,

    /// The security profile exists but is unparsable or missing mandatory
    /// fields. Fatal; authentication must not proceed to password entry.
    #[error("security profile corrupt: {0}")]
    SecurityProfileCorrupt(String),

    /// The maximum number of consecutive wrong passwords was reached.
    #[error("master password attempts exhausted")]
    AttemptsExhausted,

    /// The entered recovery code does not match the stored hash.
    /// Fatal for this process run; the user must restart to retry.
    #[error("recovery code does not match")]
    RecoveryCodeMismatch,

    /// Authenticated decryption failed: wrong key, malformed token, or
    /// tampered ciphertext.
    #[error("decryption failed: wrong key or corrupted data")]
    Decryption,

    /// The password generator was called with no character class enabled.
    #[error("invalid password generator configuration: {0}")]
    InvalidGeneratorConfig(String),

    /// A new master password failed validation (length or confirmation).
    #[error("password rejected: {0}")]
    WeakPassword(String),

    /// Configuration errors (invalid TOML, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Cryptographic primitive failure (RNG, key setup).
    #[error("crypto failure: {0}")]
    Crypto(String),

    /// Local file I/O failure.
    #[error("i/o error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Internal or unexpected errors, including state machine misuse.
    #[error("internal error: {0}")]
    Internal(String),
}
