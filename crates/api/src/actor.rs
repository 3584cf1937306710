//! Request actor extraction.
//!
//! Authentication happens upstream. The gateway forwards the authenticated
//! identity in `x-actor-username` and `x-actor-id`, and the client address in
//! `x-forwarded-for`.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use common::{Actor, RecordId};

use crate::error::ApiError;

pub const USERNAME_HEADER: &str = "x-actor-username";
pub const USER_ID_HEADER: &str = "x-actor-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

const ANONYMOUS: &str = "anonymous";
const UNKNOWN_ADDRESS: &str = "unknown";

/// The acting user of a request.
#[derive(Debug, Clone)]
pub struct RequestActor(pub Actor);

impl<S: Send + Sync> FromRequestParts<S> for RequestActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        actor_from_headers(&parts.headers).map(RequestActor)
    }
}

fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApiError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let user_id = match header(USER_ID_HEADER) {
        Some(raw) => raw
            .parse::<i64>()
            .map(RecordId::new)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {USER_ID_HEADER}: {raw}")))?,
        None => RecordId::UNASSIGNED,
    };

    // First hop is the original client.
    let source_address = header(FORWARDED_FOR_HEADER)
        .and_then(|forwarded| forwarded.split(',').next())
        .map(str::trim)
        .unwrap_or(UNKNOWN_ADDRESS);

    Ok(Actor::new(
        header(USERNAME_HEADER).unwrap_or(ANONYMOUS),
        user_id,
        source_address,
    ))
}
