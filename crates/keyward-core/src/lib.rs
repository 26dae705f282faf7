// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keyward credential vault.
//!
//! This crate provides the error taxonomy shared by every Keyward crate.
//! The security subsystem distinguishes carefully between failure classes:
//! a missing security profile is a first-run signal, a corrupt profile is
//! fatal, and a wrong password is recoverable up to the attempt limit.

pub mod error;

pub use error::KeywardError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyward_error_has_all_variants() {
        // Verify every error variant exists and can be constructed.
        let _not_found = KeywardError::SecurityProfileNotFound;
        let _corrupt = KeywardError::SecurityProfileCorrupt("missing salt".into());
        let _exhausted = KeywardError::AttemptsExhausted;
        let _recovery = KeywardError::RecoveryCodeMismatch;
        let _decryption = KeywardError::Decryption;
        let _generator = KeywardError::InvalidGeneratorConfig("no class enabled".into());
        let _weak = KeywardError::WeakPassword("too short".into());
        let _config = KeywardError::Config("bad value".into());
        let _crypto = KeywardError::Crypto("rng failure".into());
        let _io = KeywardError::Io {
            source: std::io::Error::other("disk"),
        };
        let _internal = KeywardError::Internal("unexpected".into());
    }

    #[test]
    fn corrupt_profile_message_is_distinct_from_not_found() {
        // A corrupted install must never read like a forgotten password
        // or a fresh install.
        let not_found = KeywardError::SecurityProfileNotFound.to_string();
        let corrupt = KeywardError::SecurityProfileCorrupt("bad hex".into()).to_string();
        assert_ne!(not_found, corrupt);
        assert!(corrupt.contains("corrupt"));
        assert!(not_found.contains("not found"));
    }

    #[test]
    fn io_errors_convert_via_from() {
        let err: KeywardError = std::io::Error::other("disk full").into();
        assert!(matches!(err, KeywardError::Io { .. }));
    }
}
