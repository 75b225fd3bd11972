//! HTTP API server with observability for the supplier registry.
//!
//! Provides REST endpoints for creating suppliers together with their address,
//! contact and categories in one transaction, plus read endpoints, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{
    AddressCreator, CategoryRelationCreator, CategoryRepository, ContactCreator, ContactReader,
    SupplierCreator, SupplierReader, TransactionProvider,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workflow::{SupplierFullCreator, SupplierFullService};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub full_creator: Arc<dyn SupplierFullCreator>,
    pub suppliers: Arc<dyn SupplierReader>,
    pub contacts: Arc<dyn ContactReader>,
    pub categories: Arc<dyn CategoryRepository>,
    /// Name of the backing store, reported by the health check.
    pub backend: &'static str,
}

impl AppState {
    /// Wires every handler to one store.
    pub fn from_store<S>(store: S, backend: &'static str) -> Self
    where
        S: TransactionProvider
            + SupplierCreator<S::Tx>
            + AddressCreator<S::Tx>
            + ContactCreator<S::Tx>
            + CategoryRelationCreator<S::Tx>
            + SupplierReader
            + ContactReader
            + CategoryRepository
            + Clone
            + 'static,
    {
        Self {
            full_creator: Arc::new(SupplierFullService::from_store(store.clone())),
            suppliers: Arc::new(store.clone()),
            contacts: Arc::new(store.clone()),
            categories: Arc::new(store),
            backend,
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/suppliers", get(routes::suppliers::list))
        .route("/suppliers/full", post(routes::suppliers::create_full))
        .route("/suppliers/{id}", get(routes::suppliers::get))
        .route("/contacts/{id}", get(routes::contacts::get))
        .route(
            "/categories",
            post(routes::categories::create).get(routes::categories::list),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
