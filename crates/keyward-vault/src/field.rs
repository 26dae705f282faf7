// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret field adapter: the integration point between the credential store
//! and the codec.
//!
//! `protect` always encrypts before persistence; `reveal` decrypts on read
//! and falls back to returning the stored value unchanged when decryption
//! fails, because vaults created before encryption existed still hold
//! plaintext fields. The fallback is modeled as the tagged [`Revealed`]
//! result instead of a swallowed error so callers can see which path was
//! taken.

use crate::crypto;
use crate::session::SessionKey;
use keyward_core::KeywardError;

/// The result of reading a stored secret field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revealed {
    /// The stored value was a valid token and decrypted under the session key.
    Decrypted(String),
    /// The stored value did not decrypt and is being treated as a legacy
    /// plaintext field, returned unchanged.
    LegacyPlaintext(String),
}

impl Revealed {
    /// The usable secret value, whichever path produced it.
    pub fn value(&self) -> &str {
        match self {
            Revealed::Decrypted(v) | Revealed::LegacyPlaintext(v) => v,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Revealed::Decrypted(v) | Revealed::LegacyPlaintext(v) => v,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Revealed::LegacyPlaintext(_))
    }
}

/// Encrypt a plaintext secret into its storable form.
///
/// Always encrypts; an empty value stays empty.
pub fn protect(key: &SessionKey, plaintext: &str) -> Result<String, KeywardError> {
    crypto::encrypt_token(key, plaintext)
}

/// Read back a stored secret field.
///
/// Decryption failure is deliberately converted into
/// [`Revealed::LegacyPlaintext`] rather than propagated: vaults that predate
/// encryption contain raw plaintext in secret columns, and those values must
/// keep working. The accepted trade-off is that a *corrupted* encrypted
/// field is indistinguishable from a legacy plaintext field. Do not turn
/// this into a hard failure without a migration story for legacy data.
pub fn reveal(key: &SessionKey, stored: &str) -> Revealed {
    match crypto::decrypt_token(key, stored) {
        Ok(plaintext) => Revealed::Decrypted(plaintext),
        Err(_) => Revealed::LegacyPlaintext(stored.to_string()),
    }
}

/// Mask a secret value for display: `"vpn-...p4ss"` format.
///
/// Shows up to 4 leading and 4 trailing characters with `...` in between.
/// Short values (< 10 chars) are fully masked as `"****"`. Counts and
/// slices in chars, not bytes, so non-ASCII secrets never split a
/// character.
pub fn mask_secret(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count < 10 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    let suffix: String = value.chars().skip(char_count - 4).collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key(seed: u8) -> SessionKey {
        crate::kdf::derive_key(&[seed], &[seed; 16], 1_000).unwrap()
    }

    #[test]
    fn protect_reveal_roundtrip_is_tagged_decrypted() {
        let key = test_key(1);
        let stored = protect(&key, "crm-password-9").unwrap();

        assert_ne!(stored, "crm-password-9");
        assert_eq!(
            reveal(&key, &stored),
            Revealed::Decrypted("crm-password-9".to_string())
        );
    }

    #[test]
    fn legacy_plaintext_is_returned_unchanged() {
        let key = test_key(2);
        let revealed = reveal(&key, "plain-unencrypted-value");

        assert_eq!(
            revealed,
            Revealed::LegacyPlaintext("plain-unencrypted-value".to_string())
        );
        assert_eq!(revealed.value(), "plain-unencrypted-value");
        assert!(revealed.is_legacy());
    }

    #[test]
    fn corrupted_token_falls_back_to_legacy() {
        let key = test_key(3);
        let mut stored = protect(&key, "secret").unwrap();
        // Corrupt the token; the adapter cannot tell this from legacy data.
        stored.replace_range(0..2, "AA");

        let revealed = reveal(&key, &stored);
        assert!(revealed.is_legacy());
        assert_eq!(revealed.value(), stored);
    }

    #[test]
    fn token_from_another_key_falls_back_to_legacy() {
        let k1 = test_key(4);
        let k2 = test_key(5);
        let stored = protect(&k1, "shared secret").unwrap();

        let revealed = reveal(&k2, &stored);
        assert!(revealed.is_legacy());
    }

    #[test]
    fn empty_value_stays_empty() {
        let key = test_key(6);
        let stored = protect(&key, "").unwrap();
        assert_eq!(stored, "");
        assert_eq!(reveal(&key, ""), Revealed::Decrypted(String::new()));
    }

    #[test]
    fn mask_secret_long_value() {
        assert_eq!(mask_secret("vpn-gateway-p4ssw0rd"), "vpn-...w0rd");
    }

    #[test]
    fn mask_secret_short_value() {
        assert_eq!(mask_secret("short"), "****");
    }

    #[test]
    fn mask_secret_exact_boundary() {
        assert_eq!(mask_secret("1234567890"), "1234...7890");
    }

    #[test]
    fn mask_secret_multibyte_value() {
        // Multibyte but short in chars: fully masked, no char-boundary panic.
        assert_eq!(mask_secret("€€€€"), "****");
        // Long enough to show the ends; sliced on char boundaries.
        assert_eq!(mask_secret("pääkäyttäjä-salasana"), "pääk...sana");
    }
}
