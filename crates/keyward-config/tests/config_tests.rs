// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Keyward configuration system.

use keyward_config::model::KeywardConfig;
use keyward_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_keyward_config() {
    let toml = r#"
[app]
name = "keyward-test"
log_level = "debug"

[storage]
data_dir = "/tmp/keyward-test"

[auth]
kdf_iterations = 150000
max_attempts = 5
min_password_length = 8
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.name, "keyward-test");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.storage.data_dir, "/tmp/keyward-test");
    assert_eq!(config.auth.kdf_iterations, 150_000);
    assert_eq!(config.auth.max_attempts, 5);
    assert_eq!(config.auth.min_password_length, 8);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("[app]\nname = \"x\"\n").expect("should deserialize");
    assert_eq!(config.auth.kdf_iterations, 100_000);
    assert_eq!(config.auth.max_attempts, 3);
    assert_eq!(config.auth.min_password_length, 6);
}

/// Unknown field produces a parse error mentioning the key.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[app]
nmae = "typo"
"#;
    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let msg = format!("{err}");
    assert!(
        msg.contains("unknown field") || msg.contains("nmae"),
        "error should mention unknown field or the bad key, got: {msg}"
    );
}

/// load_and_validate_str surfaces semantic validation errors.
#[test]
fn validate_str_rejects_weak_kdf() {
    let toml = r#"
[auth]
kdf_iterations = 1000
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors[0].to_string().contains("kdf_iterations"));
}

/// load_and_validate_str accepts the compiled defaults.
#[test]
fn validate_str_accepts_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    let defaults = KeywardConfig::default();
    assert_eq!(config.auth.kdf_iterations, defaults.auth.kdf_iterations);
}
