// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive credential acquisition via TTY prompt or the
//! KEYWARD_MASTER_PASSWORD environment variable.

use secrecy::SecretString;

use keyward_core::KeywardError;

/// The environment variable name for providing the master password.
pub const MASTER_PASSWORD_ENV_VAR: &str = "KEYWARD_MASTER_PASSWORD";

/// Get the master password from the environment or an interactive TTY prompt.
///
/// Priority:
/// 1. `KEYWARD_MASTER_PASSWORD` environment variable (for scripted use)
/// 2. Interactive TTY prompt via `rpassword`
///
/// Returns an error if neither source is available; an empty entry counts as
/// cancellation and aborts the startup sequence.
pub fn get_master_password() -> Result<SecretString, KeywardError> {
    if let Ok(password) = std::env::var(MASTER_PASSWORD_ENV_VAR)
        && !password.is_empty()
    {
        return Ok(SecretString::from(password));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("Master password: ");
        let password = rpassword::read_password()
            .map_err(|e| KeywardError::Internal(format!("failed to read password: {e}")))?;
        if password.is_empty() {
            return Err(KeywardError::Internal("empty password not allowed".into()));
        }
        return Ok(SecretString::from(password));
    }

    Err(KeywardError::Internal(
        "No master password provided. Set KEYWARD_MASTER_PASSWORD or run interactively.".into(),
    ))
}

/// Get a new master password with a confirmation prompt (for first-run setup
/// and recovery resets).
///
/// Prompts twice and verifies the entries match. Falls back to the env var
/// when not running on a terminal; env input needs no confirmation.
pub fn get_new_master_password() -> Result<SecretString, KeywardError> {
    if let Ok(password) = std::env::var(MASTER_PASSWORD_ENV_VAR)
        && !password.is_empty()
    {
        return Ok(SecretString::from(password));
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        eprint!("New master password: ");
        let first = rpassword::read_password()
            .map_err(|e| KeywardError::Internal(format!("failed to read password: {e}")))?;
        eprint!("Confirm master password: ");
        let second = rpassword::read_password()
            .map_err(|e| KeywardError::Internal(format!("failed to read password: {e}")))?;

        if first != second {
            return Err(KeywardError::WeakPassword(
                "confirmation does not match".into(),
            ));
        }
        if first.is_empty() {
            return Err(KeywardError::Internal("empty password not allowed".into()));
        }
        return Ok(SecretString::from(first));
    }

    Err(KeywardError::Internal(
        "No master password provided. Set KEYWARD_MASTER_PASSWORD or run interactively.".into(),
    ))
}

/// Read a recovery code from stdin.
///
/// Read with normal echo, unlike passwords: the code is a one-time value the
/// user is copying from a note anyway. EOF or an empty line counts as
/// cancellation.
pub fn get_recovery_code() -> Result<String, KeywardError> {
    use std::io::BufRead;

    eprint!("Recovery code (XXXX-XXXX-XXXX-XXXX): ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| KeywardError::Internal(format!("failed to read recovery code: {e}")))?;

    let code = line.trim().to_string();
    if code.is_empty() {
        return Err(KeywardError::Internal("recovery entry cancelled".into()));
    }
    Ok(code)
}
