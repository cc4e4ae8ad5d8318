//! Staff management of prescriptions.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use dentalis_auth::{Action, Caller, Resource};
use dentalis_core::PrescriptionId;
use dentalis_patients::{NewPrescription, Prescription, PrescriptionPatch};
use dentalis_store::PatientStore;

use crate::app::routes::common;
use crate::app::{dto, errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_prescription).get(list_prescriptions))
        .route(
            "/:id",
            get(get_prescription)
                .patch(update_prescription)
                .delete(delete_prescription),
        )
}

pub async fn create_prescription(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<NewPrescription>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Prescription, Action::Create, &services.policy)
    {
        return e;
    }

    let prescription = match Prescription::create(body) {
        Ok(prescription) => prescription,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store.insert_prescription(&prescription).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::prescription_to_json(&prescription))).into_response()
}

pub async fn list_prescriptions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Prescription, Action::List, &services.policy) {
        return e;
    }

    match services.store.list_prescriptions().await {
        Ok(prescriptions) => {
            let items: Vec<_> = prescriptions.iter().map(dto::prescription_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_prescription(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) =
        authz::require(&caller, Resource::Prescription, Action::Retrieve, &services.policy)
    {
        return e;
    }

    let id: PrescriptionId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    match services.store.prescription_by_id(id).await {
        Ok(Some(prescription)) => {
            (StatusCode::OK, Json(dto::prescription_to_json(&prescription))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "prescription not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_prescription(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(patch): Json<PrescriptionPatch>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Prescription, Action::Update, &services.policy)
    {
        return e;
    }

    let id: PrescriptionId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    if let Err(e) = patch.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.store.update_prescription(id, patch).await {
        Ok(Some(prescription)) => {
            (StatusCode::OK, Json(dto::prescription_to_json(&prescription))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "prescription not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_prescription(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Prescription, Action::Delete, &services.policy)
    {
        return e;
    }

    let id: PrescriptionId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    match services.store.delete_prescription(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "prescription not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
