use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::TokenConfig;
use crate::storage::models::{SessionToken, User};
use crate::storage::{Database, DatabaseError};

use super::generator::{generate_secret, hash_secret, verify_secret};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("No such user: {0}")]
    NoSuchUser(String),
}

fn ttl(config: &TokenConfig) -> Duration {
    Duration::minutes(config.ttl_minutes)
}

/// Issue a new token for `username`, replacing any token the user already had.
///
/// The returned plaintext is the only copy; only its hash is stored.
pub fn issue(db: &Database, config: &TokenConfig, username: &str) -> Result<String, SessionError> {
    issue_at(db, config, username, Utc::now())
}

pub fn issue_at(
    db: &Database,
    config: &TokenConfig,
    username: &str,
    now: DateTime<Utc>,
) -> Result<String, SessionError> {
    if db.get_user(username)?.is_none() {
        return Err(SessionError::NoSuchUser(username.to_string()));
    }

    let secret = generate_secret(config.length);
    let session = SessionToken {
        issued_at: now,
        token_hash: hash_secret(&secret, config.hash_cost)?,
        username: username.to_string(),
    };

    db.put_session(&session)?;
    tracing::debug!(username = %username, "Issued session token");

    Ok(secret)
}

/// Drop every expired token from storage and return the live ones
pub fn sweep_expired(
    db: &Database,
    config: &TokenConfig,
    now: DateTime<Utc>,
) -> Result<Vec<SessionToken>, SessionError> {
    let (live, dropped) = db.retain_live_sessions(now, ttl(config))?;
    if dropped > 0 {
        tracing::info!(count = dropped, "Cleaned up expired session tokens");
    }
    Ok(live)
}

/// Sweep, then find the token matching `secret`
fn find_at(
    db: &Database,
    config: &TokenConfig,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Option<SessionToken>, SessionError> {
    let live = sweep_expired(db, config, now)?;
    Ok(live
        .into_iter()
        .find(|s| verify_secret(secret, &s.token_hash)))
}

/// Whether `secret` belongs to a live token
pub fn validate(db: &Database, config: &TokenConfig, secret: &str) -> Result<bool, SessionError> {
    validate_at(db, config, secret, Utc::now())
}

pub fn validate_at(
    db: &Database,
    config: &TokenConfig,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<bool, SessionError> {
    Ok(find_at(db, config, secret, now)?.is_some())
}

/// The user owning the live token matching `secret`.
///
/// `None` both when no token matches and when the owner no longer exists.
pub fn resolve_user(
    db: &Database,
    config: &TokenConfig,
    secret: &str,
) -> Result<Option<User>, SessionError> {
    resolve_user_at(db, config, secret, Utc::now())
}

pub fn resolve_user_at(
    db: &Database,
    config: &TokenConfig,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Option<User>, SessionError> {
    match find_at(db, config, secret, now)? {
        Some(session) => Ok(db.get_user(&session.username)?),
        None => Ok(None),
    }
}

/// Revoke the token matching `secret`. Unknown secrets are a no-op.
pub fn revoke(db: &Database, secret: &str) -> Result<bool, SessionError> {
    let revoked = db.delete_session_where(|s| verify_secret(secret, &s.token_hash))?;
    if revoked {
        tracing::debug!("Revoked session token");
    }
    Ok(revoked)
}
