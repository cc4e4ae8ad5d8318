//! FAQ content, read-only.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use dentalis_auth::{Action, Caller, Resource};
use dentalis_store::ContentStore;

use crate::app::{dto, errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new().route("/categories", get(list_categories))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::FaqCategory, Action::List, &services.policy) {
        return e;
    }

    let categories = match services.store.list_faq_categories().await {
        Ok(categories) => categories,
        Err(e) => return errors::store_error_to_response(e),
    };

    let mut items = Vec::with_capacity(categories.len());
    for category in &categories {
        let entries = match services.store.faq_items_for_category(category.id).await {
            Ok(entries) => entries,
            Err(e) => return errors::store_error_to_response(e),
        };
        items.push(dto::faq_category_to_json(category, &entries));
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
