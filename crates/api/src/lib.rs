//! HTTP API server with observability for the police records system.
//!
//! Provides REST endpoints for users, officers, criminals, FIRs, cases and
//! the audit trail, with structured logging (tracing) and Prometheus metrics.

pub mod actor;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use domain::Services;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;
use routes::metrics::MetricsState;
use routes::{cases, criminals, firs, health, officers, users};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(MetricsState {
            handle: metrics_handle,
            audit: state.services.audit().clone(),
        });

    Router::new()
        .route("/health", get(health::check))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route("/users/username/{username}", get(users::get_by_username))
        .route("/officers", get(officers::list).post(officers::create))
        .route("/officers/recount", post(officers::recount))
        .route(
            "/officers/{id}",
            get(officers::get)
                .put(officers::update)
                .delete(officers::delete),
        )
        .route("/officers/{id}/workload", get(officers::workload))
        .route("/officers/badge/{badge}", get(officers::get_by_badge))
        .route("/criminals", get(criminals::list).post(criminals::create))
        .route(
            "/criminals/{id}",
            get(criminals::get)
                .put(criminals::update)
                .delete(criminals::delete),
        )
        .route("/criminals/{id}/status", patch(criminals::update_status))
        .route("/firs", get(firs::list).post(firs::create))
        .route(
            "/firs/{id}",
            get(firs::get).put(firs::update).delete(firs::delete),
        )
        .route("/firs/{id}/status", patch(firs::update_status))
        .route("/firs/{id}/assign/{officer_id}", patch(firs::assign))
        .route("/firs/number/{*number}", get(firs::get_by_number))
        .route("/cases", get(cases::list).post(cases::create))
        .route(
            "/cases/{id}",
            get(cases::get).put(cases::update).delete(cases::delete),
        )
        .route("/cases/{id}/status", patch(cases::update_status))
        .route("/cases/{id}/assign/{officer_id}", patch(cases::assign))
        .route("/cases/number/{*number}", get(cases::get_by_number))
        .route("/audit", get(routes::audit::list))
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

/// Creates the default application state over empty in-memory stores.
///
/// Must be called inside a Tokio runtime: the audit writer task is spawned
/// here.
pub fn create_default_state() -> Arc<AppState> {
    Arc::new(AppState {
        services: Services::in_memory(),
    })
}
