//! Bookshelf - book catalog GraphQL service
//!
//! All operations are exposed via GraphQL at /graphql.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::{AppState, Config, Database, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Bookshelf");

    let config = Config::from_env()?;
    tracing::info!(port = config.port, database = %config.database_url, "Configuration loaded");

    ensure_database_dir(&config.database_url)?;
    let db = Database::connect_with_retry(
        &config.database_url,
        config.database_max_connections,
        Duration::from_secs(2),
        Duration::from_secs(30),
    )
    .await?;
    tracing::info!("Database connected");

    let sync = db.sync_schema().await?;
    if !sync.tables_created.is_empty() {
        tracing::info!(tables = ?sync.tables_created, "Created missing tables");
    }
    if !sync.columns_added.is_empty() {
        tracing::info!(columns = ?sync.columns_added, "Added missing columns");
    }
    for error in &sync.errors {
        tracing::warn!(error = %error, "Schema sync issue");
    }

    let port = config.port;
    let public_host = config.host.clone().unwrap_or_else(|| "localhost".to_string());
    let state = AppState::new(&config, db.clone());
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("GraphQL endpoint: http://{}:{}/graphql", public_host, port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

/// SQLite creates the file but not its parent directory
fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
