//! Self-scoped profile view.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use dentalis_auth::{Action, Caller, Resource};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::authz;

/// `GET /me` — the caller's own patient profile with nested history.
///
/// The profile instance is derived from the caller's identity, never supplied
/// by them; staff callers have no linked profile and get 404.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::OwnProfile, Action::Retrieve, &services.policy)
    {
        return e;
    }

    let patient = match authz::resolve_owned_patient(services.store.as_ref(), &caller).await {
        Ok(patient) => patient,
        Err(e) => return e,
    };

    match common::load_profile_document(&services, &patient).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => e,
    }
}
