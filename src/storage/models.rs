use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Permission level given to users created without an explicit one
pub const DEFAULT_PERMISSION_LEVEL: i64 = 1;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Allocated identifier, unique within the user collection
    pub id: u64,
    /// bcrypt hash (salt embedded) of the password
    pub password_hash: String,
    /// 1 for regular users, anything above grants administration
    pub permission_level: i64,
    /// Case-sensitive unique key
    pub username: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.permission_level > DEFAULT_PERMISSION_LEVEL
    }
}

/// A live session token. The plaintext secret is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub issued_at: DateTime<Utc>,
    /// bcrypt hash of the secret handed to the client
    pub token_hash: String,
    /// Owner, referenced by value
    pub username: String,
}

impl SessionToken {
    /// Expired once its age reaches the TTL; a token exactly `ttl` old is gone.
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at >= ttl
    }
}

/// A tool record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Allocated inside the band of the lower-cased manufacturer
    pub id: u64,
    pub label: String,
    pub manufacturer: String,
    /// Opaque value supplied by the client
    pub quality: serde_json::Value,
}

/// keyword -> band value
pub type IdLookup = BTreeMap<String, u64>;
