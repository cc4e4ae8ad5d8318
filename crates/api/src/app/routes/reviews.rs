//! Public reviews.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use dentalis_auth::{Action, Caller, Deny, Resource};
use dentalis_content::{NewReview, Review};
use dentalis_store::{IdentityStore, ReviewStore};

use crate::app::{dto, errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new().route("/", get(list_reviews).post(create_review))
}

pub async fn list_reviews(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Review, Action::List, &services.policy) {
        return e;
    }

    match services.store.list_reviews().await {
        Ok(reviews) => {
            let items: Vec<_> = reviews.iter().map(dto::review_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `POST /reviews` — the author's display name is snapshotted at write time;
/// any `patient_name` in the body is ignored.
pub async fn create_review(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<NewReview>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Review, Action::Create, &services.policy) {
        return e;
    }

    let Some(identity_id) = caller.identity_id() else {
        return errors::deny_to_response(Deny::Unauthenticated);
    };

    let identity = match services.store.identity_by_id(identity_id).await {
        Ok(Some(identity)) => identity,
        // Valid credential for an identity that no longer exists.
        Ok(None) => return errors::deny_to_response(Deny::Unauthenticated),
        Err(e) => return errors::store_error_to_response(e),
    };

    let review = match Review::submitted_by(&identity, body) {
        Ok(review) => review,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store.insert_review(&review).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::review_to_json(&review))).into_response()
}
