//! Staff management of dental-history entries.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use dentalis_auth::{Action, Caller, Resource};
use dentalis_core::HistoryId;
use dentalis_patients::{DentalHistory, HistoryPatch, NewHistoryEntry};
use dentalis_store::PatientStore;

use crate::app::routes::common;
use crate::app::{dto, errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_entry).get(list_entries))
        .route("/:id", get(get_entry).patch(update_entry).delete(delete_entry))
}

pub async fn create_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<NewHistoryEntry>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::DentalHistory, Action::Create, &services.policy)
    {
        return e;
    }

    let entry = DentalHistory::create(body, Utc::now());
    if let Err(e) = services.store.insert_history(&entry).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::history_to_json(&entry, &[]))).into_response()
}

pub async fn list_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::DentalHistory, Action::List, &services.policy)
    {
        return e;
    }

    let entries = match services.store.list_history().await {
        Ok(entries) => entries,
        Err(e) => return errors::store_error_to_response(e),
    };

    let mut items = Vec::with_capacity(entries.len());
    for entry in &entries {
        let prescriptions = match services.store.prescriptions_for_history(entry.id).await {
            Ok(prescriptions) => prescriptions,
            Err(e) => return errors::store_error_to_response(e),
        };
        items.push(dto::history_to_json(entry, &prescriptions));
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) =
        authz::require(&caller, Resource::DentalHistory, Action::Retrieve, &services.policy)
    {
        return e;
    }

    let id: HistoryId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    let entry = match services.store.history_by_id(id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "history entry not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let prescriptions = match services.store.prescriptions_for_history(entry.id).await {
        Ok(prescriptions) => prescriptions,
        Err(e) => return errors::store_error_to_response(e),
    };

    (StatusCode::OK, Json(dto::history_to_json(&entry, &prescriptions))).into_response()
}

pub async fn update_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(patch): Json<HistoryPatch>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::DentalHistory, Action::Update, &services.policy)
    {
        return e;
    }

    let id: HistoryId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    match services.store.update_history(id, patch).await {
        Ok(Some(entry)) => (StatusCode::OK, Json(dto::history_to_json(&entry, &[]))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "history entry not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::DentalHistory, Action::Delete, &services.policy)
    {
        return e;
    }

    let id: HistoryId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    match services.store.delete_history(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "history entry not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
