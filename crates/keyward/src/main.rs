// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyward - a local credential vault gated behind a master password.
//!
//! This binary drives the startup authentication sequence. The credential
//! management shell takes over only after the vault is unlocked.

use std::path::Path;

use clap::{Parser, Subcommand};
use keyward_core::KeywardError;
use keyward_vault::{
    AuthPolicy, Authenticator, PasswordOutcome, SecurityStore, Session, StartState,
    generate_password, prompt,
};
use secrecy::SecretString;
use tracing::debug;

/// Keyward - a local credential vault gated behind a master password.
#[derive(Parser, Debug)]
#[command(name = "keyward", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Authenticate and unlock the vault (default).
    Unlock,
    /// Show the security profile location and state.
    Status,
    /// Generate a random password.
    Generate {
        /// Password length.
        #[arg(long, default_value_t = 16)]
        length: usize,
        /// Exclude uppercase letters.
        #[arg(long)]
        no_upper: bool,
        /// Exclude digits.
        #[arg(long)]
        no_digits: bool,
        /// Exclude symbols.
        #[arg(long)]
        no_symbols: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match keyward_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for error in &errors {
                eprintln!("keyward: {error}");
            }
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Status) => run_status(&config),
        Some(Commands::Generate {
            length,
            no_upper,
            no_digits,
            no_symbols,
        }) => run_generate(length, !no_upper, !no_digits, !no_symbols),
        Some(Commands::Unlock) | None => run_unlock(&config).map(|_session| {
            // The unlocked session would be handed to the credential shell
            // here; this binary stops at a successful unlock.
        }),
    };

    if let Err(e) = result {
        eprintln!("keyward: {e}");
        std::process::exit(1);
    }
}

/// Drive the authentication state machine against interactive input.
fn run_unlock(config: &keyward_config::KeywardConfig) -> Result<Session, KeywardError> {
    let store = SecurityStore::in_dir(Path::new(&config.storage.data_dir));
    let policy = AuthPolicy::from(&config.auth);
    let max_attempts = policy.max_attempts;
    let mut auth = Authenticator::new(store, policy);

    match auth.begin()? {
        StartState::FirstRun => {
            eprintln!("No vault found. Choose a master password to protect your credentials.");
            let (session, code) = new_password_with_retry(
                prompt::get_new_master_password,
                !password_from_env(),
                |password| auth.first_setup(password, password),
            )?;

            eprintln!();
            eprintln!("Your one-time recovery code: {}", code.as_str());
            eprintln!("Write it down now. It is shown only once and is the only");
            eprintln!("way to reset a forgotten master password.");
            eprintln!();
            eprintln!("Vault unlocked.");
            Ok(session)
        }
        StartState::PasswordRequired => loop {
            let candidate = prompt::get_master_password()?;
            match auth.submit_password(&candidate)? {
                PasswordOutcome::Accepted(session) => {
                    eprintln!("Vault unlocked.");
                    return Ok(session);
                }
                PasswordOutcome::Rejected { attempts_remaining } => {
                    eprintln!("Wrong master password ({attempts_remaining} attempts remaining).");
                }
                PasswordOutcome::Exhausted { recovery_available } => {
                    eprintln!("Wrong master password (0 attempts remaining).");
                    if !recovery_available {
                        return Err(KeywardError::AttemptsExhausted);
                    }
                    debug!(max_attempts, "offering recovery after lockout");
                    let code = prompt::get_recovery_code()?;
                    auth.redeem_recovery(&code)?;
                    eprintln!("Recovery code accepted. Choose a new master password.");
                    let session = new_password_with_retry(
                        prompt::get_new_master_password,
                        !password_from_env(),
                        |password| auth.reset_password(password, password),
                    )?;
                    eprintln!("Master password reset. Vault unlocked.");
                    return Ok(session);
                }
            }
        },
    }
}

/// Feed new-password entries to the state machine until one is accepted.
///
/// A rejected password (too short, confirmation mismatch) leaves the machine
/// waiting for another attempt, so the shell re-prompts instead of exiting.
/// `retry` is false when the password comes from the environment variable:
/// that value cannot change between attempts, so its rejection propagates.
fn new_password_with_retry<T>(
    mut next_password: impl FnMut() -> Result<SecretString, KeywardError>,
    retry: bool,
    mut attempt: impl FnMut(&SecretString) -> Result<T, KeywardError>,
) -> Result<T, KeywardError> {
    loop {
        match next_password().and_then(|password| attempt(&password)) {
            Ok(accepted) => return Ok(accepted),
            Err(KeywardError::WeakPassword(reason)) if retry => {
                eprintln!("Password rejected: {reason}.");
            }
            Err(e) => return Err(e),
        }
    }
}

fn password_from_env() -> bool {
    std::env::var(prompt::MASTER_PASSWORD_ENV_VAR).is_ok_and(|value| !value.is_empty())
}

fn run_status(config: &keyward_config::KeywardConfig) -> Result<(), KeywardError> {
    let store = SecurityStore::in_dir(Path::new(&config.storage.data_dir));
    println!("security profile: {}", store.path().display());

    if !store.exists() {
        println!("state: not initialized (first run pending)");
        return Ok(());
    }

    // Surfaces corruption distinctly instead of reporting a healthy vault.
    let profile = store.load()?;
    println!("state: initialized");
    println!(
        "recovery: {}",
        if profile.recovery_code_hash.is_some() {
            "available"
        } else {
            "not available"
        }
    );
    Ok(())
}

fn run_generate(
    length: usize,
    use_upper: bool,
    use_digits: bool,
    use_symbols: bool,
) -> Result<(), KeywardError> {
    let password = generate_password(length, use_upper, use_digits, use_symbols)?;
    println!("{password}");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyward={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
