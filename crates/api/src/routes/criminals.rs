//! Criminal record endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::RecordId;
use domain::{Criminal, CriminalChanges, CriminalStatus, NewCriminal};
use serde::Deserialize;

use super::{AppState, StatusChange};
use crate::actor::RequestActor;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct CriminalFilter {
    pub status: Option<CriminalStatus>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
}

/// GET /criminals
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CriminalFilter>,
) -> Json<Vec<Criminal>> {
    let criminals = &state.services.criminals;
    let mut found = match &filter.name {
        Some(name) => criminals.search(name).await,
        None => criminals.list().await,
    };
    if let Some(status) = filter.status {
        found.retain(|criminal| criminal.status == status);
    }
    Json(found)
}

/// GET /criminals/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Criminal>, ApiError> {
    Ok(Json(state.services.criminals.get(id).await?))
}

/// POST /criminals
#[tracing::instrument(skip(state, actor, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Json(req): Json<NewCriminal>,
) -> Result<(StatusCode, Json<Criminal>), ApiError> {
    let criminal = state.services.criminals.create(req, &actor).await?;
    Ok((StatusCode::CREATED, Json(criminal)))
}

/// PUT /criminals/{id}
#[tracing::instrument(skip(state, actor, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<CriminalChanges>,
) -> Result<Json<Criminal>, ApiError> {
    Ok(Json(state.services.criminals.update(id, req, &actor).await?))
}

/// PATCH /criminals/{id}/status
#[tracing::instrument(skip(state, actor))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<StatusChange<CriminalStatus>>,
) -> Result<Json<Criminal>, ApiError> {
    Ok(Json(
        state
            .services
            .criminals
            .update_status(id, req.status, &actor)
            .await?,
    ))
}

/// DELETE /criminals/{id}
#[tracing::instrument(skip(state, actor))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.services.criminals.delete(id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
