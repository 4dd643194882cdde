use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::{authenticate, run_blocking};
use crate::api::gate::{HeaderToken, LoginRequest, TokenRequest};
use crate::api::response::{ApiError, AppJson, Empty, Outcome};
use crate::credentials;
use crate::tokens::session::{self, SessionError};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<Outcome<LoginResponse>>, ApiError> {
    let login = req.validate()?;

    let token = run_blocking(&state, move |state| {
        if !credentials::verify_login(
            &state.db,
            &state.config.users,
            &login.username,
            &login.password,
        )? {
            tracing::info!(username = %login.username, "Login rejected");
            return Err(ApiError::unauthorized("Invalid username or password"));
        }

        match session::issue(&state.db, &state.config.tokens, &login.username) {
            Ok(token) => {
                tracing::info!(username = %login.username, "Login succeeded");
                Ok(token)
            }
            Err(SessionError::NoSuchUser(username)) => Err(ApiError::unexpected(format!(
                "User {username} vanished during login"
            ))),
            Err(e) => Err(e.into()),
        }
    })
    .await?;

    Ok(Outcome::success(LoginResponse { token }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    header_token: HeaderToken,
    AppJson(req): AppJson<TokenRequest>,
) -> Result<Json<Outcome<Empty>>, ApiError> {
    let token = req.validate(header_token)?;

    run_blocking(&state, move |state| {
        authenticate(state, &token)?;
        session::revoke(&state.db, &token)?;
        Ok(())
    })
    .await?;

    Ok(Outcome::success(Empty {}))
}

pub async fn validate_token(
    State(state): State<Arc<AppState>>,
    header_token: HeaderToken,
    AppJson(req): AppJson<TokenRequest>,
) -> Result<Json<Outcome<Empty>>, ApiError> {
    let token = req.validate(header_token)?;

    run_blocking(&state, move |state| authenticate(state, &token)).await?;

    Ok(Outcome::success(Empty {}))
}
