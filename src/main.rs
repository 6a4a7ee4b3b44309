//! Comment Service entry point.
//!
//! Loads configuration from the environment, opens the session pool,
//! serves HTTP until Ctrl+C or SIGTERM, then closes the pool.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use comment_service::adapters::http::middleware::SessionPoolState;
use comment_service::adapters::{app_router, InMemoryCommentStore, PostgresSessionPool};
use comment_service::config::{AppConfig, DatabaseConfig, LogFormat, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server);

    let pool = open_pool(&config.database).await?;
    let app = app_router(pool.clone(), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match server.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn open_pool(database: &DatabaseConfig) -> anyhow::Result<SessionPoolState> {
    if database.is_in_memory() {
        tracing::warn!("Using in-memory store; comments are lost on exit");
        return Ok(Arc::new(InMemoryCommentStore::new()));
    }

    let pool = PostgresSessionPool::connect(database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    tracing::info!(
        max_connections = database.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(Arc::new(pool))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::warn!("Received SIGTERM, shutting down");
        }
    }
}
