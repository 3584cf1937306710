//! User endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::RecordId;
use domain::{NewUser, User, UserChanges};

use super::AppState;
use crate::actor::RequestActor;
use crate::error::ApiError;

/// GET /users
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<User>> {
    Json(state.services.users.list().await)
}

/// GET /users/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.get(id).await?))
}

/// GET /users/username/{username}
pub async fn get_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.get_by_username(&username).await?))
}

/// POST /users
#[tracing::instrument(skip(state, actor, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.services.users.create(req, &actor).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/{id}
#[tracing::instrument(skip(state, actor, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
    Json(req): Json<UserChanges>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.users.update(id, req, &actor).await?))
}

/// DELETE /users/{id}
#[tracing::instrument(skip(state, actor))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    RequestActor(actor): RequestActor,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.services.users.delete(id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
