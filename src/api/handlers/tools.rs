use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use super::{authenticate, run_blocking};
use crate::api::gate::{CreateToolRequest, HeaderToken, TokenRequest};
use crate::api::response::{ApiError, AppJson, Empty, Outcome};
use crate::storage::models::Tool;
use crate::tools;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<Tool>,
}

pub async fn list_tools(
    State(state): State<Arc<AppState>>,
    header_token: HeaderToken,
    AppJson(req): AppJson<TokenRequest>,
) -> Result<Json<Outcome<ToolsResponse>>, ApiError> {
    let token = req.validate(header_token)?;

    let tools = run_blocking(&state, move |state| {
        authenticate(state, &token)?;
        Ok(tools::list(&state.db)?)
    })
    .await?;

    Ok(Outcome::success(ToolsResponse { tools }))
}

pub async fn create_tool(
    State(state): State<Arc<AppState>>,
    header_token: HeaderToken,
    AppJson(req): AppJson<CreateToolRequest>,
) -> Result<Json<Outcome<Empty>>, ApiError> {
    let (token, new_tool) = req.validate(header_token)?;

    run_blocking(&state, move |state| {
        authenticate(state, &token)?;
        tools::create(
            &state.db,
            &new_tool.manufacturer,
            &new_tool.label,
            new_tool.quality,
        )?;
        Ok(())
    })
    .await?;

    Ok(Outcome::success(Empty {}))
}
