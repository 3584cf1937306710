//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Audit entries accepted but not yet stored.
    pub audit_pending: usize,
}

/// GET /health: liveness plus the audit backlog.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        audit_pending: state.services.audit().pending(),
    })
}
