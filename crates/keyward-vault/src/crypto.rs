// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM codec, the self-contained token format, and the fast
//! verification hash.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the
//! system CSPRNG. Nonce reuse would be catastrophic for GCM security.
//!
//! Tokens are self-describing strings: `base64url_nopad(nonce || ciphertext
//! || tag)`. Decryption needs nothing beyond the key, so tokens embedded in
//! credential records copy safely through backups.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use crate::session::SessionKey;
use keyward_core::KeywardError;

/// GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`. The caller must keep both
/// to be able to decrypt later.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), KeywardError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeywardError::Crypto("failed to create AES-256-GCM key".into()))?;
    let less_safe = LessSafeKey::new(unbound);

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| KeywardError::Crypto("failed to generate random nonce".into()))?;

    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeywardError::Crypto("AES-256-GCM encryption failed".into()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// `ciphertext` must include the authentication tag appended by [`seal`].
/// Fails with [`KeywardError::Decryption`] on a wrong key or tampered data.
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, KeywardError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| KeywardError::Crypto("failed to create AES-256-GCM key".into()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = ciphertext.to_vec();
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeywardError::Decryption)?;

    Ok(plaintext.to_vec())
}

/// Encrypt a secret string into a self-contained token.
///
/// Empty plaintext maps to an empty token: absence of a value is not worth
/// encrypting and an empty stored field stays recognizably empty.
pub fn encrypt_token(key: &SessionKey, plaintext: &str) -> Result<String, KeywardError> {
    if plaintext.is_empty() {
        return Ok(String::new());
    }

    let (ciphertext, nonce) = seal(key.as_bytes(), plaintext.as_bytes())?;

    let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    raw.extend_from_slice(&nonce);
    raw.extend_from_slice(&ciphertext);

    Ok(URL_SAFE_NO_PAD.encode(raw))
}

/// Decrypt a token produced by [`encrypt_token`].
///
/// Fails with [`KeywardError::Decryption`] when the token is malformed, was
/// produced under a different key, or its integrity tag does not verify.
/// An empty token maps to empty plaintext.
pub fn decrypt_token(key: &SessionKey, token: &str) -> Result<String, KeywardError> {
    if token.is_empty() {
        return Ok(String::new());
    }

    let raw = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| KeywardError::Decryption)?;
    if raw.len() < NONCE_LEN + TAG_LEN {
        return Err(KeywardError::Decryption);
    }

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&raw[..NONCE_LEN]);

    let plaintext = open(key.as_bytes(), &nonce, &raw[NONCE_LEN..])?;
    String::from_utf8(plaintext).map_err(|_| KeywardError::Decryption)
}

/// A fast one-way digest used only for equality checks at login.
///
/// SHA-256 hex of the raw secret. This is intentionally *not* the slow KDF:
/// it only gates password entry, while the real protection of stored data is
/// the PBKDF2-derived key. Kept as a distinct type from
/// [`crate::SessionKey`] so verification material can never leak into
/// encryption paths, and Debug output is redacted so the digest never lands
/// in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationHash(String);

impl VerificationHash {
    /// Hash a secret for later equality checks.
    pub fn of(secret: &str) -> Self {
        let digest = ring::digest::digest(&ring::digest::SHA256, secret.as_bytes());
        Self(hex::encode(digest.as_ref()))
    }

    /// Parse a persisted hex digest.
    pub fn from_hex(hex_digest: &str) -> Result<Self, KeywardError> {
        let bytes = hex::decode(hex_digest)
            .map_err(|_| KeywardError::Crypto("verification hash is not valid hex".into()))?;
        if bytes.len() != ring::digest::SHA256_OUTPUT_LEN {
            return Err(KeywardError::Crypto(
                "verification hash has wrong length".into(),
            ));
        }
        Ok(Self(hex_digest.to_ascii_lowercase()))
    }

    /// Constant-time comparison against a candidate secret.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate_hash = Self::of(candidate);
        ring::constant_time::verify_slices_are_equal(
            self.0.as_bytes(),
            candidate_hash.0.as_bytes(),
        )
        .is_ok()
    }

    /// Hex form for persistence.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for VerificationHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VerificationHash")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Uniform random index below `bound` from the system CSPRNG.
///
/// Rejection sampling avoids modulo bias.
pub(crate) fn random_below(rng: &SystemRandom, bound: usize) -> Result<usize, KeywardError> {
    debug_assert!(bound > 0);
    let bound = bound as u32;
    let zone = (u32::MAX / bound) * bound;
    loop {
        let mut buf = [0u8; 4];
        rng.fill(&mut buf)
            .map_err(|_| KeywardError::Crypto("failed to draw random bytes".into()))?;
        let value = u32::from_le_bytes(buf);
        if value < zone {
            return Ok((value % bound) as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_key(seed: u8) -> SessionKey {
        crate::kdf::derive_key(&[seed], &[seed; 16], 1_000).unwrap()
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = test_key(1);
        let plaintext = b"rdp password for client";

        let (ciphertext, nonce) = seal(key.as_bytes(), plaintext).unwrap();
        let decrypted = open(key.as_bytes(), &nonce, &ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn seal_produces_different_ciphertext_for_same_plaintext() {
        let key = test_key(2);
        let plaintext = b"same input twice";

        let (ct1, nonce1) = seal(key.as_bytes(), plaintext).unwrap();
        let (ct2, nonce2) = seal(key.as_bytes(), plaintext).unwrap();

        // Random nonces should differ.
        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        let key = test_key(3);
        let (mut ciphertext, nonce) = seal(key.as_bytes(), b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;

        let result = open(key.as_bytes(), &nonce, &ciphertext);
        assert!(matches!(result, Err(KeywardError::Decryption)));
    }

    #[test]
    fn token_roundtrip() {
        let key = test_key(4);
        let token = encrypt_token(&key, "vpn: s3cret!").unwrap();
        assert_ne!(token, "vpn: s3cret!");
        assert_eq!(decrypt_token(&key, &token).unwrap(), "vpn: s3cret!");
    }

    #[test]
    fn empty_plaintext_maps_to_empty_token_and_back() {
        let key = test_key(5);
        assert_eq!(encrypt_token(&key, "").unwrap(), "");
        assert_eq!(decrypt_token(&key, "").unwrap(), "");
    }

    #[test]
    fn decrypt_with_wrong_key_fails() {
        let k1 = test_key(6);
        let k2 = test_key(7);

        let token = encrypt_token(&k1, "secret data").unwrap();
        let result = decrypt_token(&k2, &token);

        assert!(matches!(result, Err(KeywardError::Decryption)));
    }

    #[test]
    fn malformed_tokens_fail_cleanly() {
        let key = test_key(8);

        // Not base64.
        assert!(matches!(
            decrypt_token(&key, "not a token!!"),
            Err(KeywardError::Decryption)
        ));
        // Valid base64 but too short to hold nonce + tag.
        let short = URL_SAFE_NO_PAD.encode([0u8; 8]);
        assert!(matches!(
            decrypt_token(&key, &short),
            Err(KeywardError::Decryption)
        ));
    }

    #[test]
    fn verification_hash_matches_same_secret_only() {
        let hash = VerificationHash::of("Sunflower1");
        assert!(hash.matches("Sunflower1"));
        assert!(!hash.matches("Sunflower2"));
        assert!(!hash.matches(""));
    }

    #[test]
    fn verification_hash_hex_roundtrip() {
        let hash = VerificationHash::of("master");
        let parsed = VerificationHash::from_hex(hash.as_hex()).unwrap();
        assert_eq!(hash, parsed);
        assert_eq!(hash.as_hex().len(), 64);
    }

    #[test]
    fn verification_hash_rejects_bad_hex() {
        assert!(VerificationHash::from_hex("zzzz").is_err());
        assert!(VerificationHash::from_hex("abcd").is_err()); // valid hex, wrong length
    }

    #[test]
    fn verification_hash_debug_is_redacted() {
        let hash = VerificationHash::of("top secret");
        let debug = format!("{hash:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(hash.as_hex()));
    }

    #[test]
    fn random_below_stays_in_bounds() {
        let rng = SystemRandom::new();
        for _ in 0..1_000 {
            let value = random_below(&rng, 36).unwrap();
            assert!(value < 36);
        }
    }

    proptest! {
        // Round-trip must hold for arbitrary plaintexts under any derived key.
        #[test]
        fn prop_token_roundtrip(plaintext in ".*", seed in any::<u8>()) {
            let key = test_key(seed);
            let token = encrypt_token(&key, &plaintext).unwrap();
            prop_assert_eq!(decrypt_token(&key, &token).unwrap(), plaintext);
        }
    }
}
