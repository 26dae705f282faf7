// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of the security profile: salt, password verification hash,
//! and the optional recovery-code hash.
//!
//! The profile lives in a single JSON file loaded once at startup. A missing
//! file signals first run; an unparsable file or one missing a mandatory
//! field is corrupt, and authentication refuses to proceed. Saving writes to
//! a temp file in the same directory and renames over the target, so an
//! interrupted write leaves the previous profile intact.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::VerificationHash;
use crate::kdf::SALT_LEN;
use keyward_core::KeywardError;

/// File name of the security profile inside the data directory.
pub const SECURITY_FILE_NAME: &str = "security.json";

/// The persisted security profile.
///
/// `salt` and `password_hash` are mandatory; a profile without both is
/// corrupt. `recovery_code_hash` is absent on vaults created before the
/// recovery feature existed, which means no recovery is possible for them.
#[derive(Debug, Clone)]
pub struct SecurityProfile {
    pub salt: [u8; SALT_LEN],
    pub password_hash: VerificationHash,
    pub recovery_code_hash: Option<VerificationHash>,
}

/// On-disk JSON shape of [`SecurityProfile`].
#[derive(Serialize, Deserialize)]
struct SecurityProfileFile {
    salt: String,
    password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recovery_code_hash: Option<String>,
}

/// Loads and saves the security profile at a fixed path.
#[derive(Debug, Clone)]
pub struct SecurityStore {
    path: PathBuf,
}

impl SecurityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store rooted at the conventional file name inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SECURITY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the profile.
    ///
    /// Returns [`KeywardError::SecurityProfileNotFound`] when no file exists
    /// (the first-run signal) and [`KeywardError::SecurityProfileCorrupt`]
    /// when the file exists but cannot be understood.
    pub fn load(&self) -> Result<SecurityProfile, KeywardError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(KeywardError::SecurityProfileNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let raw: SecurityProfileFile = serde_json::from_str(&content)
            .map_err(|e| KeywardError::SecurityProfileCorrupt(e.to_string()))?;

        let salt_bytes = hex::decode(&raw.salt)
            .map_err(|_| KeywardError::SecurityProfileCorrupt("salt is not valid hex".into()))?;
        let salt: [u8; SALT_LEN] = salt_bytes.try_into().map_err(|_| {
            KeywardError::SecurityProfileCorrupt(format!("salt must be {SALT_LEN} bytes"))
        })?;

        let password_hash = VerificationHash::from_hex(&raw.password_hash).map_err(|_| {
            KeywardError::SecurityProfileCorrupt("password hash is not a valid digest".into())
        })?;

        let recovery_code_hash = match raw.recovery_code_hash {
            Some(hex_digest) => Some(VerificationHash::from_hex(&hex_digest).map_err(|_| {
                KeywardError::SecurityProfileCorrupt(
                    "recovery code hash is not a valid digest".into(),
                )
            })?),
            None => None,
        };

        debug!(path = %self.path.display(), "security profile loaded");
        Ok(SecurityProfile {
            salt,
            password_hash,
            recovery_code_hash,
        })
    }

    /// Persist the profile atomically.
    ///
    /// Writes the full document to a temp file next to the target and renames
    /// it into place; either the new profile lands whole or the old one
    /// survives.
    pub fn save(&self, profile: &SecurityProfile) -> Result<(), KeywardError> {
        let raw = SecurityProfileFile {
            salt: hex::encode(profile.salt),
            password_hash: profile.password_hash.as_hex().to_string(),
            recovery_code_hash: profile
                .recovery_code_hash
                .as_ref()
                .map(|h| h.as_hex().to_string()),
        };

        let json = serde_json::to_string_pretty(&raw)
            .map_err(|e| KeywardError::Internal(format!("profile serialization failed: {e}")))?;

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path)
            .map_err(|e| KeywardError::Io { source: e.error })?;

        debug!(path = %self.path.display(), "security profile saved");
        Ok(())
    }
}
