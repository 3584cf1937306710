//! Audit trail queries.

use std::sync::Arc;

use audit::{AuditAction, AuditLogEntry, AuditQuery};
use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use common::{EntityKind, RecordId};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct AuditParams {
    pub entity_type: Option<String>,
    pub entity_id: Option<RecordId>,
    pub user_id: Option<RecordId>,
    pub action: Option<AuditAction>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditParams {
    fn into_query(self) -> Result<AuditQuery, ApiError> {
        let entity_type = self
            .entity_type
            .map(|name| {
                EntityKind::parse(&name)
                    .ok_or_else(|| ApiError::BadRequest(format!("Unknown entity type: {name}")))
            })
            .transpose()?;

        Ok(AuditQuery {
            entity_type,
            entity_id: self.entity_id,
            user_id: self.user_id,
            action: self.action,
            from_timestamp: self.from,
            to_timestamp: self.to,
            limit: self.limit,
        })
    }
}

/// GET /audit: entries matching every given filter, oldest first.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditParams>,
) -> Result<Json<Vec<AuditLogEntry>>, ApiError> {
    let query = params.into_query()?;
    Ok(Json(state.services.audit().query(query).await))
}
