//! Staff view over patient profiles.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use dentalis_auth::{Action, Caller, Resource};
use dentalis_core::PatientId;
use dentalis_store::PatientStore;

use crate::app::routes::common;
use crate::app::{errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_patients))
        .route("/:id", get(get_patient).delete(delete_patient))
}

pub async fn list_patients(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Patient, Action::List, &services.policy) {
        return e;
    }

    let patients = match services.store.list_patients().await {
        Ok(patients) => patients,
        Err(e) => return errors::store_error_to_response(e),
    };

    let mut items = Vec::with_capacity(patients.len());
    for patient in &patients {
        match common::load_profile_document(&services, patient).await {
            Ok(document) => items.push(document),
            Err(e) => return e,
        }
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_patient(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Patient, Action::Retrieve, &services.policy) {
        return e;
    }

    let id: PatientId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    let patient = match services.store.patient_by_id(id).await {
        Ok(Some(patient)) => patient,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "patient not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    match common::load_profile_document(&services, &patient).await {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(e) => e,
    }
}

/// Cascade delete: the profile, its history entries, their prescriptions and
/// its appointments all go, or nothing does.
pub async fn delete_patient(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Patient, Action::Delete, &services.policy) {
        return e;
    }

    let id: PatientId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    match services.store.delete_patient(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "patient not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
