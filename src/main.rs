//! ff-event-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST, relay and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use ff_event_gateway::api;
use ff_event_gateway::app_state::AppState;
use ff_event_gateway::config::GatewayConfig;
use ff_event_gateway::persistence::{HistoryStore, MemoryHistoryStore, PostgresHistoryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config =
        GatewayConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    init_tracing(config.log_json);
    tracing::info!(addr = %config.listen_addr, "starting ff-event-gateway");

    // Build persistence layer
    let store: Arc<dyn HistoryStore> = if config.persistence_enabled {
        tracing::info!("connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .context("failed to connect to database")?;
        let store = PostgresHistoryStore::new(pool);
        store.migrate().await.context("failed to run migrations")?;
        tracing::info!("database ready");
        Arc::new(store)
    } else {
        tracing::warn!("persistence disabled, history is kept in memory");
        Arc::new(MemoryHistoryStore::new())
    };

    // Shared HTTP client for transports and the relay
    let client = reqwest::Client::builder()
        .user_agent(config.relay.user_agent.as_str())
        .build()
        .context("failed to build HTTP client")?;

    // Build application state and router
    let app_state = AppState::new(&config, &client, store);
    let app = api::build_app(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received ctrl-c, initiating graceful shutdown"),
        Err(err) => {
            tracing::error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
