//! Consistent error responses.
//!
//! Body shape is always `{"error": <code>, "message": <text>}` with the
//! status mapping: 401 unauthenticated, 403 forbidden, 404 not_found,
//! 400 validation_failed, 500 internal.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use dentalis_auth::Deny;
use dentalis_core::DomainError;
use dentalis_store::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Policy denials are terminal for the request.
pub fn deny_to_response(deny: Deny) -> axum::response::Response {
    match deny {
        Deny::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        Deny::Forbidden => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "insufficient capability",
        ),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        ),
        DomainError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_failed", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Internal(msg) => {
            tracing::error!(error = %msg, "internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        // Constraint violations are caller errors: duplicate username/slug,
        // or a reference to a parent row that does not exist.
        StoreError::Conflict(msg) => json_error(StatusCode::BAD_REQUEST, "validation_failed", msg),
        StoreError::InvalidReference(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_failed", msg)
        }
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
        }
    }
}
