mod auth;
mod tools;
mod users;

use std::sync::Arc;

use crate::api::response::ApiError;
use crate::credentials::CredentialError;
use crate::storage::models::User;
use crate::tokens::session::{self, SessionError};
use crate::tools::ToolError;
use crate::AppState;

pub use auth::{login, logout, validate_token};
pub use tools::{create_tool, list_tools};
pub use users::{create_user, list_users};

/// Run blocking store work off the async runtime and wait for it
async fn run_blocking<F, R>(state: &Arc<AppState>, f: F) -> Result<R, ApiError>
where
    F: FnOnce(&AppState) -> Result<R, ApiError> + Send + 'static,
    R: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| ApiError::unexpected(format!("Request task panicked: {e}")))?
}

/// Reject unless `token` belongs to a live session
fn authenticate(state: &AppState, token: &str) -> Result<(), ApiError> {
    if session::validate(&state.db, &state.config.tokens, token)? {
        Ok(())
    } else {
        Err(ApiError::unauthorized("Invalid token"))
    }
}

/// Authenticate, then require the token owner to be an administrator
fn authorize_admin(state: &AppState, token: &str) -> Result<User, ApiError> {
    authenticate(state, token)?;

    let user = session::resolve_user(&state.db, &state.config.tokens, token)?
        .ok_or_else(|| ApiError::unexpected("Token owner could not be resolved"))?;

    if !user.is_admin() {
        tracing::debug!(username = %user.username, "Permission denied");
        return Err(ApiError::missing_permission("Missing permission"));
    }
    Ok(user)
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::unexpected(e.to_string())
    }
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::AlreadyExists(username) => {
                ApiError::already_exists(format!("User already exists: {username}"))
            }
            _ => ApiError::unexpected(e.to_string()),
        }
    }
}

impl From<ToolError> for ApiError {
    fn from(e: ToolError) -> Self {
        ApiError::unexpected(e.to_string())
    }
}
