//! Officer endpoints, including workload reads and counter repair.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::RecordId;
use domain::{NewOfficer, Officer, OfficerChanges, OfficerStatus, OfficerWorkload};
use serde::Deserialize;

use super::AppState;
use crate::actor::RequestActor;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct OfficerFilter {
    pub status: Option<OfficerStatus>,
    pub department: Option<String>,
}

/// GET /officers
///
/// `status` takes precedence over `department` when both are given.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<OfficerFilter>,
) -> Json<Vec<Officer>> {
    let officers = &state.services.officers;
    let found = match filter {
        OfficerFilter {
            status: Some(status),
            ..
        } => officers.by_status(status).await,
        OfficerFilter {
            department: Some(department),
            ..
        } => officers.by_department(&department).await,
        _ => officers.list().await,
    };
    Json(found)
}

/// GET /officers/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Officer>, ApiError> {
    Ok(Json(state.services.officers.get(id).await?))
}

/// GET /officers/badge/{badge}
pub async fn get_by_badge(
    State(state): State<Arc<AppState>>,
    Path(badge): Path<String>,
) -> Result<Json<Officer>, ApiError> {
    Ok(Json(state.services.officers.get_by_badge(&badge).await?))
}

/// GET /officers/{id}/workload
pub async fn workload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<OfficerWorkload>, ApiError> {
    Ok(Json(state.services.officers.workload(id).await?))
}

/// POST /officers
#[tracing::instrument(skip(state, actor, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Json(req): Json<NewOfficer>,
) -> Result<(StatusCode, Json<Officer>), ApiError> {
    let officer = state.services.officers.create(req, &actor).await?;
    Ok((StatusCode::CREATED, Json(officer)))
}

/// PUT /officers/{id}
#[tracing::instrument(skip(state, actor, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<OfficerChanges>,
) -> Result<Json<Officer>, ApiError> {
    Ok(Json(state.services.officers.update(id, req, &actor).await?))
}

/// DELETE /officers/{id}
#[tracing::instrument(skip(state, actor))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.services.officers.delete(id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /officers/recount: returns the officers whose counters were fixed.
#[tracing::instrument(skip(state, actor))]
pub async fn recount(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
) -> Result<Json<Vec<Officer>>, ApiError> {
    Ok(Json(
        state.services.officers.recount_workloads(&actor).await?,
    ))
}
