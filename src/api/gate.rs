//! Request gate
//!
//! Inbound payloads are deserialized with every field optional and then
//! checked once here, producing either a validated request or the name of
//! the first missing field. Handlers only ever see validated requests.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use serde::{Deserialize, Deserializer};
use std::convert::Infallible;
use thiserror::Error;

use super::response::ApiError;
use crate::storage::models::DEFAULT_PERMISSION_LEVEL;

/// Why a payload was turned away
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl From<Rejected> for ApiError {
    fn from(rejected: Rejected) -> Self {
        ApiError::invalid_request(rejected.to_string())
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Rejected> {
    value.ok_or(Rejected::MissingField(field))
}

/// A key that is present counts even when its value is `null`
fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

// ============================================================================
// Token carried outside the body
// ============================================================================

/// Token from `Authorization: Bearer ...` or the `token` cookie, used when
/// the body does not carry one.
#[derive(Debug, Default)]
pub struct HeaderToken(pub Option<String>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for HeaderToken {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|v| v.trim().to_string());

        let cookie = || {
            parts
                .headers
                .get_all(COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|v| v.split(';'))
                .find_map(|pair| pair.trim().strip_prefix("token="))
                .and_then(|raw| urlencoding::decode(raw).ok())
                .map(|v| v.into_owned())
        };

        Ok(HeaderToken(
            bearer.or_else(cookie).filter(|t| !t.is_empty()),
        ))
    }
}

// ============================================================================
// Raw payloads
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenRequest {
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateToolRequest {
    pub data: Option<ToolData>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolData {
    pub label: Option<String>,
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub quality: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub data: Option<UserData>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserData {
    pub password: Option<String>,
    #[serde(default, alias = "permissions")]
    pub permission: Option<serde_json::Value>,
    pub username: Option<String>,
}

// ============================================================================
// Validated requests
// ============================================================================

#[derive(Debug, PartialEq)]
pub struct Login {
    pub password: String,
    pub username: String,
}

#[derive(Debug, PartialEq)]
pub struct NewTool {
    pub label: String,
    pub manufacturer: String,
    pub quality: serde_json::Value,
}

#[derive(Debug, PartialEq)]
pub struct NewUser {
    pub password: String,
    pub permission_level: i64,
    pub username: String,
}

impl LoginRequest {
    pub fn validate(self) -> Result<Login, Rejected> {
        Ok(Login {
            username: require(self.username, "username")?,
            password: require(self.password, "password")?,
        })
    }
}

impl TokenRequest {
    pub fn validate(self, fallback: HeaderToken) -> Result<String, Rejected> {
        require(self.token.or(fallback.0), "token")
    }
}

impl CreateToolRequest {
    pub fn validate(self, fallback: HeaderToken) -> Result<(String, NewTool), Rejected> {
        let token = require(self.token.or(fallback.0), "token")?;
        let data = require(self.data, "data")?;
        let tool = NewTool {
            manufacturer: require(data.manufacturer, "manufacturer")?,
            label: require(data.label, "label")?,
            quality: require(data.quality, "quality")?,
        };
        Ok((token, tool))
    }
}

impl CreateUserRequest {
    pub fn validate(self, fallback: HeaderToken) -> Result<(String, NewUser), Rejected> {
        let token = require(self.token.or(fallback.0), "token")?;
        let data = require(self.data, "data")?;
        let user = NewUser {
            username: require(data.username, "username")?,
            password: require(data.password, "password")?,
            permission_level: parse_permission(data.permission.as_ref()),
        };
        Ok((token, user))
    }
}

/// Numbers and numeric strings are taken as levels, anything else is level 1.
///
/// Fractions round up, so a level counts as admin exactly when the number
/// sent was above 1.
pub fn parse_permission(value: Option<&serde_json::Value>) -> i64 {
    use serde_json::Value;

    let level = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(round_level)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse()
                .ok()
                .or_else(|| s.parse().ok().and_then(round_level))
        }
        _ => None,
    };
    level.unwrap_or(DEFAULT_PERMISSION_LEVEL)
}

fn round_level(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.ceil() as i64)
}
