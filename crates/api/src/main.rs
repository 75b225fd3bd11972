//! API server entry point.

use std::sync::Arc;

use api::AppState;
use api::config::Config;
use sqlx::postgres::PgPoolOptions;
use store::{InMemoryStore, PostgresStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Connects to PostgreSQL when `DATABASE_URL` is set, otherwise falls back to
/// the in-memory store.
async fn build_state(config: &Config) -> AppState {
    let Some(url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, using in-memory store");
        return AppState::from_store(InMemoryStore::new(), "memory");
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await
        .expect("failed to connect to database");
    let store = PostgresStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("failed to apply schema");
    tracing::info!(
        max_connections = config.max_connections,
        "connected to PostgreSQL"
    );

    AppState::from_store(store, "postgres")
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Connect the store and build the application
    let state = Arc::new(build_state(&config).await);
    let app = api::create_app(state, metrics_handle);

    // 4. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
