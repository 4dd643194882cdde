//! toolshed - A small session-token authenticated registry of users and tools
//!
//! This crate provides:
//! - Salted password storage and login verification
//! - Opaque session tokens, hashed at rest, one per user, expired lazily
//! - Namespaced, collision-free ID allocation
//! - Whole-file JSON persistence with one writer lock per document
//! - REST API answering with flat numeric result codes

pub mod api;
pub mod config;
pub mod credentials;
pub mod storage;
#[cfg(test)]
pub mod testutil;
pub mod tokens;
pub mod tools;

use config::Config;
use storage::Database;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub db: Database,
}
