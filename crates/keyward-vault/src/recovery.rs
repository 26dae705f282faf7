// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-time recovery code issuing and verification.
//!
//! The code is the sole fallback authentication factor, so it is drawn from
//! the system CSPRNG, shown to the user exactly once at first setup, and
//! only its verification hash is persisted.

use ring::rand::SystemRandom;

use crate::crypto::{VerificationHash, random_below};
use keyward_core::KeywardError;

/// Characters a recovery code is drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Number of hyphen-separated groups.
const GROUPS: usize = 4;

/// Characters per group.
const GROUP_LEN: usize = 4;

/// A freshly minted recovery code, formatted `XXXX-XXXX-XXXX-XXXX`.
///
/// Display it once, then drop it; only the hash survives. Debug output is
/// redacted so the code cannot leak through logging.
#[derive(Clone)]
pub struct RecoveryCode(String);

impl RecoveryCode {
    /// Generate a new code from the system CSPRNG.
    pub fn generate() -> Result<Self, KeywardError> {
        let rng = SystemRandom::new();
        let mut groups = Vec::with_capacity(GROUPS);
        for _ in 0..GROUPS {
            let mut group = String::with_capacity(GROUP_LEN);
            for _ in 0..GROUP_LEN {
                let idx = random_below(&rng, CODE_ALPHABET.len())?;
                group.push(CODE_ALPHABET[idx] as char);
            }
            groups.push(group);
        }
        Ok(Self(groups.join("-")))
    }

    /// The user-facing form, e.g. `AB12-CD34-EF56-GH78`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hash for persistence, using the same one-way hash as password
    /// verification.
    pub fn verification_hash(&self) -> VerificationHash {
        VerificationHash::of(&self.0)
    }
}

impl std::fmt::Debug for RecoveryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RecoveryCode").field(&"[REDACTED]").finish()
    }
}

/// Normalize user input to the canonical hyphenated form.
///
/// Uppercases, strips whitespace, and re-inserts hyphens when the user typed
/// the 16 characters without separators.
pub fn normalize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() == GROUPS * GROUP_LEN && !cleaned.contains('-') {
        let mut grouped = String::with_capacity(cleaned.len() + GROUPS - 1);
        for (i, c) in cleaned.chars().enumerate() {
            if i > 0 && i % GROUP_LEN == 0 {
                grouped.push('-');
            }
            grouped.push(c);
        }
        return grouped;
    }

    cleaned
}

/// Hash a candidate entry for comparison against the stored hash.
pub fn hash_candidate(input: &str) -> VerificationHash {
    VerificationHash::of(&normalize(input))
}
