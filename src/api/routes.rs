use axum::{
    handler::HandlerWithoutStateExt,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/token", post(handlers::validate_token))
        .route(
            "/api/tools",
            get(handlers::list_tools).put(handlers::create_tool),
        )
        .route(
            "/api/users",
            get(handlers::list_users).put(handlers::create_user),
        );

    // Frontend -- unknown paths bounce back to the index
    let static_files =
        ServeDir::new(&state.config.node.static_dir).not_found_service(redirect_home.into_service());

    Router::new()
        .merge(api_routes)
        .fallback_service(static_files)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn redirect_home(uri: Uri) -> Response {
    if uri.path() == "/" {
        // The index itself is missing; redirecting would loop
        return StatusCode::NOT_FOUND.into_response();
    }
    Redirect::to("/").into_response()
}
