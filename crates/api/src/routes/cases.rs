//! Case endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::RecordId;
use domain::{Case, CaseChanges, CaseStatus, NewCase};
use serde::Deserialize;

use super::{AppState, StatusChange};
use crate::actor::RequestActor;
use crate::error::ApiError;

/// Query filters for `GET /cases`. All given filters must match.
#[derive(Debug, Default, Deserialize)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub officer_id: Option<RecordId>,
    pub criminal_id: Option<RecordId>,
}

/// GET /cases
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CaseFilter>,
) -> Json<Vec<Case>> {
    let cases = &state.services.cases;
    let mut found = match (filter.officer_id, filter.criminal_id, filter.status) {
        (Some(officer_id), _, _) => cases.by_officer(officer_id).await,
        (None, Some(criminal_id), _) => cases.by_criminal(criminal_id).await,
        (None, None, Some(status)) => cases.by_status(status).await,
        (None, None, None) => cases.list().await,
    };
    found.retain(|case| {
        filter.status.is_none_or(|status| case.status == status)
            && filter
                .criminal_id
                .is_none_or(|id| case.criminal_ids.contains(&id))
    });
    Json(found)
}

/// GET /cases/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Case>, ApiError> {
    Ok(Json(state.services.cases.get(id).await?))
}

/// GET /cases/number/{*number}
pub async fn get_by_number(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<Case>, ApiError> {
    Ok(Json(state.services.cases.get_by_number(&number).await?))
}

/// POST /cases
#[tracing::instrument(skip(state, actor, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Json(req): Json<NewCase>,
) -> Result<(StatusCode, Json<Case>), ApiError> {
    let case = state.services.cases.create(req, &actor).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

/// PUT /cases/{id}
#[tracing::instrument(skip(state, actor, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<CaseChanges>,
) -> Result<Json<Case>, ApiError> {
    Ok(Json(state.services.cases.update(id, req, &actor).await?))
}

/// PATCH /cases/{id}/status
#[tracing::instrument(skip(state, actor))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<StatusChange<CaseStatus>>,
) -> Result<Json<Case>, ApiError> {
    Ok(Json(
        state
            .services
            .cases
            .update_status(id, req.status, &actor)
            .await?,
    ))
}

/// PATCH /cases/{id}/assign/{officer_id}
#[tracing::instrument(skip(state, actor))]
pub async fn assign(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path((id, officer_id)): Path<(RecordId, RecordId)>,
) -> Result<Json<Case>, ApiError> {
    Ok(Json(
        state
            .services
            .cases
            .assign_to_officer(id, officer_id, &actor)
            .await?,
    ))
}

/// DELETE /cases/{id}
#[tracing::instrument(skip(state, actor))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.services.cases.delete(id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
