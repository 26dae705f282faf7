// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes: the KDF iteration floor, attempt limits, and non-empty paths.

use thiserror::Error;

use crate::model::KeywardConfig;

/// Minimum PBKDF2 iteration count accepted from configuration.
/// Anything lower weakens the password-derived key against offline guessing.
pub const KDF_ITERATION_FLOOR: u32 = 100_000;

/// Minimum master password length accepted from configuration.
pub const MIN_PASSWORD_LENGTH_FLOOR: usize = 6;

/// A configuration error surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be parsed at all.
    #[error("configuration parse error: {message}")]
    Parse { message: String },

    /// A parsed value violates a semantic constraint.
    #[error("configuration validation error: {message}")]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &KeywardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.data_dir must not be empty".to_string(),
        });
    }

    if config.auth.kdf_iterations < KDF_ITERATION_FLOOR {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.kdf_iterations must be at least {KDF_ITERATION_FLOOR}, got {}",
                config.auth.kdf_iterations
            ),
        });
    }

    if config.auth.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "auth.max_attempts must be at least 1".to_string(),
        });
    }

    if config.auth.min_password_length < MIN_PASSWORD_LENGTH_FLOOR {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.min_password_length must be at least {MIN_PASSWORD_LENGTH_FLOOR}, got {}",
                config.auth.min_password_length
            ),
        });
    }

    if config.app.log_level.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "app.log_level must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeywardConfig;

    #[test]
    fn default_config_validates() {
        let config = KeywardConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn low_kdf_iterations_rejected() {
        let mut config = KeywardConfig::default();
        config.auth.kdf_iterations = 10_000;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("kdf_iterations"));
    }

    #[test]
    fn zero_max_attempts_rejected() {
        let mut config = KeywardConfig::default();
        config.auth.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("max_attempts"));
    }

    #[test]
    fn short_min_password_length_rejected() {
        let mut config = KeywardConfig::default();
        config.auth.min_password_length = 4;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("min_password_length"));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = KeywardConfig::default();
        config.auth.kdf_iterations = 1;
        config.auth.max_attempts = 0;
        config.storage.data_dir = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
