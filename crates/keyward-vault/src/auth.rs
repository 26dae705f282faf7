// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The startup authentication state machine.
//!
//! Drives the login sequence before the application reaches its main
//! feature set: first-run setup, password verification with a bounded
//! attempt count, and the recovery-code branch once attempts are exhausted.
//! Each entry point corresponds to one state transition and returns a
//! discriminated result; the interactive shell supplies input and renders
//! the outcomes.
//!
//! A successful transition hands out an immutable [`Session`]. A password
//! reset produces a new `Session` value rather than mutating anything in
//! place.

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::crypto::VerificationHash;
use crate::kdf;
use crate::recovery::{self, RecoveryCode};
use crate::session::Session;
use crate::store::{SecurityProfile, SecurityStore};
use keyward_core::KeywardError;

/// Authentication policy knobs, sourced from configuration.
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    /// PBKDF2 iteration count for session key derivation.
    pub kdf_iterations: u32,
    /// Consecutive wrong passwords allowed before lockout.
    pub max_attempts: u32,
    /// Minimum master password length in characters.
    pub min_password_length: usize,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            kdf_iterations: kdf::DEFAULT_ITERATIONS,
            max_attempts: 3,
            min_password_length: 6,
        }
    }
}

impl From<&keyward_config::model::AuthConfig> for AuthPolicy {
    fn from(config: &keyward_config::model::AuthConfig) -> Self {
        Self {
            kdf_iterations: config.kdf_iterations,
            max_attempts: config.max_attempts,
            min_password_length: config.min_password_length,
        }
    }
}

/// Where the startup sequence begins after loading the security profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartState {
    /// No profile exists yet; a master password must be created.
    FirstRun,
    /// A profile exists; the master password must be entered.
    PasswordRequired,
}

/// Result of submitting a candidate master password.
#[derive(Debug)]
pub enum PasswordOutcome {
    /// Password verified; the vault is unlocked.
    Accepted(Session),
    /// Wrong password, retry allowed.
    Rejected { attempts_remaining: u32 },
    /// The attempt limit was reached. Recovery is offered only when the
    /// profile carries a recovery-code hash.
    Exhausted { recovery_available: bool },
}

/// Internal machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    FirstSetup,
    AwaitingPassword,
    RecoveryOffered,
    RecoveryVerified,
    Unlocked,
    Failed,
}

/// The authentication state machine.
///
/// One instance per process run; attempt counts reset only on restart or
/// successful authentication.
#[derive(Debug)]
pub struct Authenticator {
    store: SecurityStore,
    policy: AuthPolicy,
    profile: Option<SecurityProfile>,
    attempts_made: u32,
    phase: Phase,
}

impl Authenticator {
    pub fn new(store: SecurityStore, policy: AuthPolicy) -> Self {
        Self {
            store,
            policy,
            profile: None,
            attempts_made: 0,
            phase: Phase::Start,
        }
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    /// Load the security profile and decide how the run starts.
    ///
    /// A missing profile means first run. A corrupt profile is fatal and is
    /// surfaced as its own error so the user does not mistake a broken
    /// install for a forgotten password.
    pub fn begin(&mut self) -> Result<StartState, KeywardError> {
        if self.phase != Phase::Start {
            return Err(KeywardError::Internal(
                "authentication already started".into(),
            ));
        }
        match self.store.load() {
            Ok(profile) => {
                self.profile = Some(profile);
                self.phase = Phase::AwaitingPassword;
                Ok(StartState::PasswordRequired)
            }
            Err(KeywardError::SecurityProfileNotFound) => {
                info!("no security profile found, first-run setup required");
                self.phase = Phase::FirstSetup;
                Ok(StartState::FirstRun)
            }
            Err(e) => {
                self.phase = Phase::Failed;
                Err(e)
            }
        }
    }

    /// First-run setup: create the master password and mint the one-time
    /// recovery code.
    ///
    /// On success the profile is persisted and the returned code must be
    /// shown to the user exactly once; only its hash survives. A validation
    /// failure (length, confirmation mismatch) leaves the machine in the
    /// setup state so the shell can re-prompt.
    pub fn first_setup(
        &mut self,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<(Session, RecoveryCode), KeywardError> {
        if self.phase != Phase::FirstSetup {
            return Err(KeywardError::Internal(
                "first-run setup is not pending".into(),
            ));
        }
        self.validate_new_password(password, confirm)?;

        let salt = kdf::generate_salt()?;
        let key = kdf::derive_key(
            password.expose_secret().as_bytes(),
            &salt,
            self.policy.kdf_iterations,
        )?;
        let code = RecoveryCode::generate()?;

        let profile = SecurityProfile {
            salt,
            password_hash: VerificationHash::of(password.expose_secret()),
            recovery_code_hash: Some(code.verification_hash()),
        };
        self.store.save(&profile)?;
        self.profile = Some(profile);
        self.attempts_made = 0;
        self.phase = Phase::Unlocked;

        info!("security profile created, vault unlocked");
        Ok((Session::new(key), code))
    }

    /// Verify a candidate master password.
    ///
    /// On a match the session key is derived from the candidate and the
    /// stored salt, and the attempt counter resets. Below the limit a
    /// mismatch stays retryable; at the limit the machine moves on to the
    /// recovery offer (or fails outright when no recovery hash exists).
    pub fn submit_password(
        &mut self,
        candidate: &SecretString,
    ) -> Result<PasswordOutcome, KeywardError> {
        if self.phase != Phase::AwaitingPassword {
            return Err(KeywardError::Internal(
                "no password entry is pending".into(),
            ));
        }
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| KeywardError::Internal("profile missing after begin".into()))?;

        if profile.password_hash.matches(candidate.expose_secret()) {
            let key = kdf::derive_key(
                candidate.expose_secret().as_bytes(),
                &profile.salt,
                self.policy.kdf_iterations,
            )?;
            self.attempts_made = 0;
            self.phase = Phase::Unlocked;
            info!("master password accepted, vault unlocked");
            return Ok(PasswordOutcome::Accepted(Session::new(key)));
        }

        self.attempts_made += 1;
        if self.attempts_made < self.policy.max_attempts {
            let attempts_remaining = self.policy.max_attempts - self.attempts_made;
            warn!(attempts_remaining, "master password rejected");
            return Ok(PasswordOutcome::Rejected { attempts_remaining });
        }

        let recovery_available = profile.recovery_code_hash.is_some();
        self.phase = if recovery_available {
            Phase::RecoveryOffered
        } else {
            Phase::Failed
        };
        warn!(recovery_available, "master password attempts exhausted");
        Ok(PasswordOutcome::Exhausted { recovery_available })
    }

    /// Redeem the recovery code after attempts are exhausted.
    ///
    /// A mismatch is fatal for this run: the machine moves to the failed
    /// state and no further recovery attempts are accepted until restart.
    pub fn redeem_recovery(&mut self, code: &str) -> Result<(), KeywardError> {
        if self.phase != Phase::RecoveryOffered {
            return Err(KeywardError::Internal(
                "recovery is not available in this state".into(),
            ));
        }
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| KeywardError::Internal("profile missing after begin".into()))?;
        let stored = profile
            .recovery_code_hash
            .as_ref()
            .ok_or_else(|| KeywardError::Internal("recovery offered without a hash".into()))?;

        if stored.matches(&recovery::normalize(code)) {
            self.phase = Phase::RecoveryVerified;
            info!("recovery code accepted");
            Ok(())
        } else {
            self.phase = Phase::Failed;
            warn!("recovery code rejected, authentication failed for this run");
            Err(KeywardError::RecoveryCodeMismatch)
        }
    }

    /// Set a new master password after a successful recovery.
    ///
    /// Generates a fresh salt, so the previous session key cannot be
    /// re-derived: tokens protected before the reset will surface through
    /// the legacy-plaintext fallback on later reads. The recovery hash is
    /// carried forward unchanged, which means a redeemed code keeps working
    /// on future runs; changing that would need a release-notes entry.
    pub fn reset_password(
        &mut self,
        new_password: &SecretString,
        confirm: &SecretString,
    ) -> Result<Session, KeywardError> {
        if self.phase != Phase::RecoveryVerified {
            return Err(KeywardError::Internal(
                "recovery code has not been verified".into(),
            ));
        }
        self.validate_new_password(new_password, confirm)?;

        let recovery_code_hash = self
            .profile
            .as_ref()
            .and_then(|p| p.recovery_code_hash.clone());

        let salt = kdf::generate_salt()?;
        let key = kdf::derive_key(
            new_password.expose_secret().as_bytes(),
            &salt,
            self.policy.kdf_iterations,
        )?;

        let profile = SecurityProfile {
            salt,
            password_hash: VerificationHash::of(new_password.expose_secret()),
            recovery_code_hash,
        };
        self.store.save(&profile)?;
        self.profile = Some(profile);
        self.attempts_made = 0;
        self.phase = Phase::Unlocked;

        info!("master password reset via recovery code, vault unlocked");
        Ok(Session::new(key))
    }

    fn validate_new_password(
        &self,
        password: &SecretString,
        confirm: &SecretString,
    ) -> Result<(), KeywardError> {
        let len = password.expose_secret().chars().count();
        if len < self.policy.min_password_length {
            return Err(KeywardError::WeakPassword(format!(
                "must be at least {} characters",
                self.policy.min_password_length
            )));
        }
        if password.expose_secret() != confirm.expose_secret() {
            return Err(KeywardError::WeakPassword(
                "confirmation does not match".into(),
            ));
        }
        Ok(())
    }
}
