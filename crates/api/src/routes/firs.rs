//! FIR endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::RecordId;
use domain::{Fir, FirChanges, FirStatus, NewFir};
use serde::Deserialize;

use super::{AppState, StatusChange};
use crate::actor::RequestActor;
use crate::error::ApiError;

/// Query filters for `GET /firs`. All given filters must match.
#[derive(Debug, Default, Deserialize)]
pub struct FirFilter {
    pub status: Option<FirStatus>,
    pub officer_id: Option<RecordId>,
    pub criminal_id: Option<RecordId>,
}

/// GET /firs
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<FirFilter>,
) -> Json<Vec<Fir>> {
    let firs = &state.services.firs;
    let mut found = match (filter.officer_id, filter.criminal_id, filter.status) {
        (Some(officer_id), _, _) => firs.by_officer(officer_id).await,
        (None, Some(criminal_id), _) => firs.by_criminal(criminal_id).await,
        (None, None, Some(status)) => firs.by_status(status).await,
        (None, None, None) => firs.list().await,
    };
    found.retain(|fir| {
        filter.status.is_none_or(|status| fir.status == status)
            && filter
                .criminal_id
                .is_none_or(|id| fir.criminal_id == Some(id))
    });
    Json(found)
}

/// GET /firs/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Fir>, ApiError> {
    Ok(Json(state.services.firs.get(id).await?))
}

/// GET /firs/number/{*number}
///
/// FIR numbers contain slashes, so the whole remaining path is the number.
pub async fn get_by_number(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<Fir>, ApiError> {
    Ok(Json(state.services.firs.get_by_number(&number).await?))
}

/// POST /firs
#[tracing::instrument(skip(state, actor, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Json(req): Json<NewFir>,
) -> Result<(StatusCode, Json<Fir>), ApiError> {
    let fir = state.services.firs.create(req, &actor).await?;
    Ok((StatusCode::CREATED, Json(fir)))
}

/// PUT /firs/{id}
#[tracing::instrument(skip(state, actor, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<FirChanges>,
) -> Result<Json<Fir>, ApiError> {
    Ok(Json(state.services.firs.update(id, req, &actor).await?))
}

/// PATCH /firs/{id}/status
#[tracing::instrument(skip(state, actor))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<StatusChange<FirStatus>>,
) -> Result<Json<Fir>, ApiError> {
    Ok(Json(
        state
            .services
            .firs
            .update_status(id, req.status, &actor)
            .await?,
    ))
}

/// PATCH /firs/{id}/assign/{officer_id}
#[tracing::instrument(skip(state, actor))]
pub async fn assign(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path((id, officer_id)): Path<(RecordId, RecordId)>,
) -> Result<Json<Fir>, ApiError> {
    Ok(Json(
        state
            .services
            .firs
            .assign_to_officer(id, officer_id, &actor)
            .await?,
    ))
}

/// DELETE /firs/{id}
#[tracing::instrument(skip(state, actor))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.services.firs.delete(id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
