//! API-side authorization guard.
//!
//! This enforces the access policy at the request boundary (before any store
//! access), keeping the policy table in `dentalis-auth` the single source of
//! truth. Self-scoped actions additionally resolve the caller's linked
//! patient profile here.

use axum::response::Response;

use dentalis_auth::{Action, Caller, PolicyConfig, Resource, authorize};
use dentalis_patients::Patient;
use dentalis_store::{ClinicStore, PatientStore};

use crate::app::errors;

/// Check the policy table for this request; on deny, the mapped 401/403
/// response is terminal.
pub fn require(
    caller: &Caller,
    resource: Resource,
    action: Action,
    policy: &PolicyConfig,
) -> Result<(), Response> {
    authorize(caller, resource, action, policy).map_err(errors::deny_to_response)
}

/// Resolve the patient profile owned by the caller.
///
/// Fails with 404 when no profile is linked (e.g. staff callers have none),
/// and with 401 when the caller is anonymous.
pub async fn resolve_owned_patient(
    store: &dyn ClinicStore,
    caller: &Caller,
) -> Result<Patient, Response> {
    let identity_id = caller
        .identity_id()
        .ok_or_else(|| errors::deny_to_response(dentalis_auth::Deny::Unauthenticated))?;

    match store.patient_by_identity(identity_id).await {
        Ok(Some(patient)) => Ok(patient),
        Ok(None) => Err(errors::json_error(
            axum::http::StatusCode::NOT_FOUND,
            "not_found",
            "no linked patient profile",
        )),
        Err(err) => Err(errors::store_error_to_response(err)),
    }
}
