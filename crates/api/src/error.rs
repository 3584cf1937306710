//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed input the domain never saw.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => (domain_status(&err), err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        _ if err.is_not_found() => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use common::EntityKind;

    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        assert_eq!(
            domain_status(&DomainError::not_found(EntityKind::Fir, 3)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            domain_status(&DomainError::Conflict("dup".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            domain_status(&DomainError::Validation("name is required".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn bad_request_renders_json_error() {
        let response = ApiError::BadRequest("bad id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
