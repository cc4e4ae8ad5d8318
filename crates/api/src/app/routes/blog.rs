//! Blog posts, read-only, keyed by slug.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use dentalis_auth::{Action, Caller, Resource};
use dentalis_content::Slug;
use dentalis_store::ContentStore;

use crate::app::{dto, errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/:slug", get(get_post))
}

pub async fn list_posts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::BlogPost, Action::List, &services.policy) {
        return e;
    }

    match services.store.list_posts().await {
        Ok(posts) => {
            let items: Vec<_> = posts.iter().map(dto::post_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(slug): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::BlogPost, Action::Retrieve, &services.policy) {
        return e;
    }

    // A string that is not a well-formed slug cannot name a post.
    let Ok(slug) = slug.parse::<Slug>() else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "post not found");
    };

    match services.store.post_by_slug(&slug).await {
        Ok(Some(post)) => (StatusCode::OK, Json(dto::post_to_json(&post))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "post not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
