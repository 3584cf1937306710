//! HTTP route handlers.

pub mod audit;
pub mod cases;
pub mod criminals;
pub mod firs;
pub mod health;
pub mod metrics;
pub mod officers;
pub mod users;

use domain::Services;
use serde::Deserialize;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub services: Services,
}

/// Body of `PATCH /{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusChange<S> {
    pub status: S,
}
