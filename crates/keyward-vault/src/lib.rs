// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master-password authentication and envelope encryption for Keyward.
//!
//! Every secret field the application persists is wrapped in an
//! AES-256-GCM token whose key is derived from the master password via
//! PBKDF2-HMAC-SHA256. The master password itself is never stored: login
//! compares a fast SHA-256 verification hash, and the session key is
//! re-derived from the entered password and the persisted salt. A one-time
//! recovery code (hash-persisted only) allows resetting the master password
//! after the attempt limit is reached.

pub mod auth;
pub mod crypto;
pub mod field;
pub mod kdf;
pub mod passgen;
pub mod prompt;
pub mod recovery;
pub mod session;
pub mod store;

pub use auth::{AuthPolicy, Authenticator, PasswordOutcome, StartState};
pub use crypto::VerificationHash;
pub use field::{Revealed, mask_secret, protect, reveal};
pub use passgen::generate_password;
pub use prompt::{get_master_password, get_new_master_password, get_recovery_code};
pub use recovery::RecoveryCode;
pub use session::{Session, SessionKey};
pub use store::{SecurityProfile, SecurityStore};
