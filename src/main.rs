//! chairtime server entry point.
//!
//! Starts the Axum HTTP server over a PostgreSQL-backed store.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chairtime::api;
use chairtime::app_state::AppState;
use chairtime::config::AppConfig;
use chairtime::notify::{LogNotifier, Notifier};
use chairtime::persistence::{BookingStore, PostgresStore};
use chairtime::service::{AvailabilityRegistry, BookingLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting chairtime");

    // Connect to the store and apply migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("connecting to PostgreSQL")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("applying migrations")?;

    // Build the store, notifier, and service layer
    let store: Arc<dyn BookingStore> = Arc::new(PostgresStore::new(pool));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let registry = Arc::new(AvailabilityRegistry::new(Arc::clone(&store)));
    let ledger = Arc::new(BookingLedger::new(store, notifier));

    // Build application state
    let app_state = AppState { ledger, registry };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .context("binding listen address")?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
