//! Credential store: registration, lookup and password verification.

use std::sync::OnceLock;

use thiserror::Error;

use crate::config::UserConfig;
use crate::storage::models::{User, DEFAULT_PERMISSION_LEVEL};
use crate::storage::{Database, DatabaseError};
use crate::tokens::{hash_secret, verify_secret};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Register a user. Existing usernames are rejected, never overwritten.
pub fn create_user(
    db: &Database,
    config: &UserConfig,
    username: &str,
    password: &str,
    permission_level: i64,
) -> Result<User, CredentialError> {
    let password_hash = hash_secret(password, config.password_hash_cost)?;

    match db.insert_user(username, password_hash, permission_level)? {
        Some(user) => {
            tracing::info!(
                id = user.id,
                username = %username,
                permission_level,
                "Created user"
            );
            Ok(user)
        }
        None => Err(CredentialError::AlreadyExists(username.to_string())),
    }
}

/// True iff the user exists and the password matches its stored hash.
///
/// Unknown usernames still pay for one bcrypt comparison so the response
/// time does not reveal whether the account exists.
pub fn verify_login(
    db: &Database,
    config: &UserConfig,
    username: &str,
    password: &str,
) -> Result<bool, CredentialError> {
    match db.get_user(username)? {
        Some(user) => Ok(verify_secret(password, &user.password_hash)),
        None => {
            let decoy = decoy_hash(config.password_hash_cost)?;
            let _ = verify_secret(password, decoy);
            Ok(false)
        }
    }
}

pub fn find_user(db: &Database, username: &str) -> Result<Option<User>, CredentialError> {
    Ok(db.get_user(username)?)
}

pub fn list_users(db: &Database) -> Result<Vec<User>, CredentialError> {
    Ok(db.get_all_users()?)
}

/// Create the configured administrator unless an account with that name exists
pub fn ensure_bootstrap_admin(db: &Database, config: &UserConfig) -> Result<bool, CredentialError> {
    let Some(admin) = &config.bootstrap_admin else {
        return Ok(false);
    };

    if db.get_user(&admin.username)?.is_some() {
        tracing::debug!(username = %admin.username, "Bootstrap admin already present");
        return Ok(false);
    }

    match create_user(
        db,
        config,
        &admin.username,
        &admin.password,
        DEFAULT_PERMISSION_LEVEL + 1,
    ) {
        Ok(_) => Ok(true),
        Err(CredentialError::AlreadyExists(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

fn decoy_hash(cost: u32) -> Result<&'static str, CredentialError> {
    static DECOY: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DECOY.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_secret("decoy-password", cost)?;
    Ok(DECOY.get_or_init(|| hash).as_str())
}
