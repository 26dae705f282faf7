// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation under character-class constraints.
//!
//! Independent utility code: stateless, shares nothing with the rest of the
//! subsystem beyond the secure random source. Lowercase letters are always
//! in the pool; the flags enable the additional classes, and the generated
//! password contains at least one character from each enabled class when the
//! length permits.

use ring::rand::SystemRandom;

use crate::crypto::random_below;
use keyward_core::KeywardError;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";

/// The symbol set offered by the generator.
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Generate a random password of `length` characters.
///
/// Fails with [`KeywardError::InvalidGeneratorConfig`] when no character
/// class flag is enabled or `length` is zero. All draws, including the final
/// shuffle, come from the system CSPRNG.
pub fn generate_password(
    length: usize,
    use_upper: bool,
    use_digits: bool,
    use_symbols: bool,
) -> Result<String, KeywardError> {
    if !(use_upper || use_digits || use_symbols) {
        return Err(KeywardError::InvalidGeneratorConfig(
            "enable at least one of uppercase, digits, or symbols".into(),
        ));
    }
    if length == 0 {
        return Err(KeywardError::InvalidGeneratorConfig(
            "length must be at least 1".into(),
        ));
    }

    let mut pool = String::from(LOWERCASE);
    let mut required: Vec<&str> = Vec::new();
    if use_upper {
        pool.push_str(UPPERCASE);
        required.push(UPPERCASE);
    }
    if use_digits {
        pool.push_str(DIGITS);
        required.push(DIGITS);
    }
    if use_symbols {
        pool.push_str(SYMBOLS);
        required.push(SYMBOLS);
    }

    let rng = SystemRandom::new();
    let mut chars: Vec<char> = Vec::with_capacity(length);

    // One guaranteed character per enabled class, as long as they fit.
    for class in required.iter().take(length) {
        chars.push(pick(&rng, class)?);
    }
    while chars.len() < length {
        chars.push(pick(&rng, &pool)?);
    }

    // Fisher-Yates so the guaranteed characters do not cluster at the front.
    for i in (1..chars.len()).rev() {
        let j = random_below(&rng, i + 1)?;
        chars.swap(i, j);
    }

    Ok(chars.into_iter().collect())
}

fn pick(rng: &SystemRandom, charset: &str) -> Result<char, KeywardError> {
    let bytes = charset.as_bytes();
    let idx = random_below(rng, bytes.len())?;
    Ok(bytes[idx] as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_classes_present_over_many_trials() {
        for _ in 0..1_000 {
            let password = generate_password(16, true, true, true).unwrap();
            assert_eq!(password.chars().count(), 16);
            assert!(password.chars().any(|c| c.is_ascii_uppercase()));
            assert!(password.chars().any(|c| c.is_ascii_digit()));
            assert!(password.chars().any(|c| SYMBOLS.contains(c)));
        }
    }

    #[test]
    fn no_class_enabled_is_invalid_configuration() {
        let result = generate_password(16, false, false, false);
        assert!(matches!(
            result,
            Err(KeywardError::InvalidGeneratorConfig(_))
        ));
    }

    #[test]
    fn zero_length_is_invalid_configuration() {
        let result = generate_password(0, true, true, true);
        assert!(matches!(
            result,
            Err(KeywardError::InvalidGeneratorConfig(_))
        ));
    }

    #[test]
    fn disabled_classes_never_appear() {
        for _ in 0..200 {
            let password = generate_password(20, true, false, false).unwrap();
            assert!(!password.chars().any(|c| c.is_ascii_digit()));
            assert!(!password.chars().any(|c| SYMBOLS.contains(c)));
        }
    }

    #[test]
    fn every_character_comes_from_the_pool() {
        let password = generate_password(64, true, true, true).unwrap();
        for c in password.chars() {
            assert!(
                c.is_ascii_lowercase()
                    || c.is_ascii_uppercase()
                    || c.is_ascii_digit()
                    || SYMBOLS.contains(c),
                "unexpected character: {c}"
            );
        }
    }

    #[test]
    fn length_shorter_than_enabled_classes_still_generates() {
        // Three classes enabled but only room for two guaranteed picks.
        let password = generate_password(2, true, true, true).unwrap();
        assert_eq!(password.chars().count(), 2);
    }

    #[test]
    fn successive_passwords_differ() {
        let a = generate_password(16, true, true, true).unwrap();
        let b = generate_password(16, true, true, true).unwrap();
        assert_ne!(a, b);
    }
}
