//! Helpers shared across route modules.

use core::str::FromStr;

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use dentalis_patients::Patient;
use dentalis_store::{IdentityStore, PatientStore};

use crate::app::{dto, errors, services::AppServices};

/// Parse a path id, mapping failures to a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: FromStr,
{
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid identifier")
    })
}

/// Assemble the full profile document for one patient: identity details and
/// the dental history (newest visit first) with prescriptions nested.
pub async fn load_profile_document(
    services: &AppServices,
    patient: &Patient,
) -> Result<Value, Response> {
    let identity = services
        .store
        .identity_by_id(patient.identity)
        .await
        .map_err(errors::store_error_to_response)?;

    let entries = services
        .store
        .history_for_patient(patient.id)
        .await
        .map_err(errors::store_error_to_response)?;

    let mut history = Vec::with_capacity(entries.len());
    for entry in entries {
        let prescriptions = services
            .store
            .prescriptions_for_history(entry.id)
            .await
            .map_err(errors::store_error_to_response)?;
        history.push((entry, prescriptions));
    }

    Ok(dto::profile_to_json(patient, identity.as_ref(), &history))
}
