use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::{authorize_admin, run_blocking};
use crate::api::gate::{CreateUserRequest, HeaderToken, TokenRequest};
use crate::api::response::{ApiError, AppJson, Empty, Outcome};
use crate::credentials;
use crate::storage::models::User;
use crate::AppState;

/// A user as exposed over the API; the password hash never leaves the server
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub permission_level: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    header_token: HeaderToken,
    AppJson(req): AppJson<TokenRequest>,
) -> Result<Json<Outcome<UsersResponse>>, ApiError> {
    let token = req.validate(header_token)?;

    let users = run_blocking(&state, move |state| {
        authorize_admin(state, &token)?;
        Ok(credentials::list_users(&state.db)?)
    })
    .await?;

    Ok(Outcome::success(UsersResponse {
        users: users.iter().map(user_to_response).collect(),
    }))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    header_token: HeaderToken,
    AppJson(req): AppJson<CreateUserRequest>,
) -> Result<Json<Outcome<Empty>>, ApiError> {
    let (token, new_user) = req.validate(header_token)?;

    run_blocking(&state, move |state| {
        let admin = authorize_admin(state, &token)?;
        credentials::create_user(
            &state.db,
            &state.config.users,
            &new_user.username,
            &new_user.password,
            new_user.permission_level,
        )?;
        tracing::debug!(created_by = %admin.username, username = %new_user.username, "User created via API");
        Ok(())
    })
    .await?;

    Ok(Outcome::success(Empty {}))
}

fn user_to_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        permission_level: user.permission_level,
        username: user.username.clone(),
    }
}
