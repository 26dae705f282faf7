// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master password.
//!
//! Derives a 32-byte session key with a deliberately slow work factor
//! (100,000 iterations by default). Derivation is deterministic: the same
//! (password, salt) always yields the same key, which is what lets a
//! returning user re-derive the session key without it ever being stored.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::session::SessionKey;
use keyward_core::KeywardError;

/// Length of the derived key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Length of the per-vault random salt in bytes.
pub const SALT_LEN: usize = 16;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte session key from the master password.
///
/// The returned key is wrapped in [`Zeroizing`] storage inside
/// [`SessionKey`] for automatic memory zeroing on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<SessionKey, KeywardError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| KeywardError::Crypto("PBKDF2 iteration count must be non-zero".into()))?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        output.as_mut(),
    );

    Ok(SessionKey::new(output))
}

/// Generate a random 16-byte salt for key derivation.
///
/// Generated once per vault at first setup and regenerated only on a
/// password reset; never reused across vaults.
pub fn generate_salt() -> Result<[u8; SALT_LEN], KeywardError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| KeywardError::Crypto("failed to generate random salt".into()))?;
    Ok(salt)
}
