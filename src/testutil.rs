//! Shared test helpers — available to all `#[cfg(test)]` modules in the crate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use crate::config::{Config, NodeConfig, TokenConfig, UserConfig};
use crate::storage::models::SessionToken;
use crate::storage::Database;
use crate::AppState;

/// Open a fresh database in a temporary directory.
///
/// Returns both the `Database` and the `TempDir` guard — the caller must
/// keep the `TempDir` alive for the duration of the test.
pub fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path()).unwrap();
    (db, temp_dir)
}

/// A minimal `Config` suitable for unit tests (cheapest bcrypt cost).
pub fn test_config() -> Config {
    Config {
        node: NodeConfig {
            bind_address: "127.0.0.1:8080".to_string(),
            data_dir: "/tmp/test".to_string(),
            log_dir: "/tmp/test-logs".to_string(),
            static_dir: "/tmp/test-html".to_string(),
        },
        tokens: TokenConfig {
            hash_cost: 4,
            ..TokenConfig::default()
        },
        users: UserConfig {
            bootstrap_admin: None,
            password_hash_cost: 4,
        },
    }
}

/// Build a full `Arc<AppState>` around the given database.
pub fn test_state(db: Database) -> Arc<AppState> {
    Arc::new(AppState {
        config: test_config(),
        db,
    })
}

/// Create a `SessionToken` with the given hash and owner.
pub fn make_session(token_hash: &str, username: &str, issued_at: DateTime<Utc>) -> SessionToken {
    SessionToken {
        issued_at,
        token_hash: token_hash.to_string(),
        username: username.to_string(),
    }
}
