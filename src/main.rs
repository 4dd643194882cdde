use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toolshed::{api, config::Config, credentials, storage::Database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first: the log directory is part of it
    let config = Config::load()?;

    // Initialize tracing (stdout + daily log file)
    std::fs::create_dir_all(&config.node.log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&config.node.log_dir, "toolshed.log");
    let (file_writer, _file_guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default().to_lowercase();
    let gcp_layer = (log_format == "gcp").then(|| tracing_stackdriver::layer());
    let json_layer = (log_format == "json").then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_span_list(false)
    });
    let text_layer =
        (log_format != "gcp" && log_format != "json").then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(gcp_layer)
        .with(json_layer)
        .with(text_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "toolshed starting");

    // Initialize database
    let db = Database::open(&config.node.data_dir)?;
    info!("Data directory opened at: {}", config.node.data_dir);

    if credentials::ensure_bootstrap_admin(&db, &config.users)? {
        info!("Bootstrap administrator created");
    }

    // Create shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
    });

    // Build and start the HTTP server
    let app = api::create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&config.node.bind_address).await?;
    info!("Listening on: {}", config.node.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
