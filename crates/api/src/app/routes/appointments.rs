//! Appointment booking (patients) and management (staff).
//!
//! Visibility is owner-or-staff by default: a patient sees only appointments
//! belonging to their linked profile. The legacy unfiltered mode is behind
//! `PolicyConfig::open_appointment_listing`.

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
use dentalis_core::AppointmentId;
use dentalis_patients::{Appointment, AppointmentPatch, AppointmentRequest};
use dentalis_store::AppointmentStore;

use crate::app::routes::common;
use crate::app::{dto, errors, services::AppServices};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", post(book_appointment).get(list_appointments))
        .route(
            "/:id",
            get(get_appointment)
                .patch(update_appointment)
                .delete(delete_appointment),
        )
}

/// `POST /appointments` — self-scoped creation.
///
/// The owning profile is resolved from the caller and the status starts
/// `Pending`; the request body cannot set either (any such fields are
/// ignored). Everything else passes through unchanged.
pub async fn book_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<AppointmentRequest>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Appointment, Action::Create, &services.policy)
    {
        return e;
    }

    let patient = match authz::resolve_owned_patient(services.store.as_ref(), &caller).await {
        Ok(patient) => patient,
        Err(e) => return e,
    };

    let appointment = match Appointment::book(patient.id, body, Utc::now()) {
        Ok(appointment) => appointment,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.store.insert_appointment(&appointment).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::appointment_to_json(&appointment))).into_response()
}

pub async fn list_appointments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Appointment, Action::List, &services.policy) {
        return e;
    }

    // Staff (and the legacy open mode) see every row; patients see their own.
    let appointments = if caller.is_staff() || services.policy.open_appointment_listing {
        services.store.list_appointments().await
    } else {
        let patient = match authz::resolve_owned_patient(services.store.as_ref(), &caller).await {
            Ok(patient) => patient,
            Err(e) => return e,
        };
        services.store.appointments_for_patient(patient.id).await
    };

    match appointments {
        Ok(appointments) => {
            let items: Vec<_> = appointments.iter().map(dto::appointment_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) =
        authz::require(&caller, Resource::Appointment, Action::Retrieve, &services.policy)
    {
        return e;
    }

    let id: AppointmentId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    let appointment = match services.store.appointment_by_id(id).await {
        Ok(Some(appointment)) => appointment,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "appointment not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    if !caller.is_staff() && !services.policy.open_appointment_listing {
        let patient = match authz::resolve_owned_patient(services.store.as_ref(), &caller).await {
            Ok(patient) => patient,
            Err(e) => return e,
        };
        // Another patient's appointment is indistinguishable from a missing one.
        if appointment.patient != patient.id {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "appointment not found");
        }
    }

    (StatusCode::OK, Json(dto::appointment_to_json(&appointment))).into_response()
}

pub async fn update_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(patch): Json<AppointmentPatch>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Appointment, Action::Update, &services.policy)
    {
        return e;
    }

    let id: AppointmentId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    if let Err(e) = patch.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.store.update_appointment(id, patch).await {
        Ok(Some(appointment)) => {
            (StatusCode::OK, Json(dto::appointment_to_json(&appointment))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "appointment not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_appointment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = authz::require(&caller, Resource::Appointment, Action::Delete, &services.policy)
    {
        return e;
    }

    let id: AppointmentId = match common::parse_id(&id) {
        Ok(id) => id,
        Err(e) => return e,
    };

    match services.store.delete_appointment(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "appointment not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
