use axum::{Json, http::StatusCode, response::IntoResponse};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Welcome document at the root, listing the top-level endpoints.
pub async fn home() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Dentalis API",
        "endpoints": {
            "blog": "/blog/posts",
            "faq": "/faq/categories",
            "reviews": "/reviews",
            "patients": "/patients",
            "appointments": "/appointments",
            "register": "/auth/register",
            "token": "/auth/token",
        }
    }))
}
