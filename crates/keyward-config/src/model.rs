// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Keyward credential vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Keyward configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeywardConfig {
    /// Application identity and logging settings.
    #[serde(default)]
    pub app: AppConfig,

    /// On-disk data locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Master-password authentication policy.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name of the application.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// On-disk data locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the security profile (`security.json`) and the
    /// credential database managed by the application shell.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Master-password authentication policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100,000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Consecutive wrong passwords allowed before lockout (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum master password length (default: 6).
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            max_attempts: default_max_attempts(),
            min_password_length: default_min_password_length(),
        }
    }
}

fn default_app_name() -> String {
    "keyward".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|d| d.join("keyward").display().to_string())
        .unwrap_or_else(|| ".keyward".to_string())
}

fn default_kdf_iterations() -> u32 {
    100_000 // floor for PBKDF2-HMAC-SHA256, enforced by validation
}

fn default_max_attempts() -> u32 {
    3
}

fn default_min_password_length() -> usize {
    6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = KeywardConfig::default();
        assert_eq!(config.app.name, "keyward");
        assert_eq!(config.app.log_level, "info");
        assert_eq!(config.auth.kdf_iterations, 100_000);
        assert_eq!(config.auth.max_attempts, 3);
        assert_eq!(config.auth.min_password_length, 6);
        assert!(!config.storage.data_dir.is_empty());
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = KeywardConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: KeywardConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.auth.kdf_iterations, config.auth.kdf_iterations);
        assert_eq!(parsed.storage.data_dir, config.storage.data_dir);
    }
}
