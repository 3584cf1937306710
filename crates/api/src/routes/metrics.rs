//! Prometheus metrics endpoint.

use audit::AuditTrail;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// State for the metrics route.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub audit: AuditTrail,
}

/// GET /metrics: returns Prometheus-formatted metrics.
///
/// The audit queue gauge is refreshed first so an idle trail still reports
/// its current depth.
pub async fn get(State(state): State<MetricsState>) -> impl IntoResponse {
    metrics::gauge!("audit_queue_depth").set(state.audit.pending() as f64);

    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
