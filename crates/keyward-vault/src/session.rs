// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The unlocked session: an immutable value holding the derived key.
//!
//! A [`Session`] is created exactly once per successful authentication (or
//! password reset) and passed to every component that protects or reveals a
//! secret. A password change produces a *new* `Session`; the key inside an
//! existing one is never rewritten, so a `Session` behind a shared reference
//! is safe to read from any thread without locking.

use zeroize::Zeroizing;

use crate::field::{self, Revealed};
use keyward_core::KeywardError;

/// The 32-byte symmetric key derived from (master password, salt).
///
/// Only ever in memory; zeroed on drop. Debug output intentionally omits
/// the key bytes. Kept as a distinct type from [`crate::VerificationHash`]
/// so the key can never be confused with the fast login hash.
pub struct SessionKey(Zeroizing<[u8; 32]>);

impl SessionKey {
    pub(crate) fn new(bytes: Zeroizing<[u8; 32]>) -> Self {
        Self(bytes)
    }

    /// Raw key bytes for the AEAD codec.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionKey").field(&"[REDACTED]").finish()
    }
}

/// The unlocked vault session.
#[derive(Debug)]
pub struct Session {
    key: SessionKey,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// Encrypt a secret field for persistence. See [`field::protect`].
    pub fn protect(&self, plaintext: &str) -> Result<String, KeywardError> {
        field::protect(&self.key, plaintext)
    }

    /// Decrypt a stored secret field. See [`field::reveal`].
    pub fn reveal(&self, stored: &str) -> Revealed {
        field::reveal(&self.key, stored)
    }
}
