//! Registration and both authentication mechanisms.
//!
//! `POST /auth/register` + `POST /auth/token` serve patients (bearer JWT);
//! `POST /auth/staff-session` serves the staff dashboard (opaque session
//! cookie). Both credentials resolve to the same caller type downstream.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;

use dentalis_auth::{Caller, Deny, Identity, PasswordHash, Registration};
use dentalis_core::IdentityId;
use dentalis_store::{
    IdentityStore, SessionStore, StoreError, ensure_patient_profile,
};

use crate::app::{dto, errors, services::AppServices};
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(token))
        .route("/staff-session", post(staff_login).delete(staff_logout))
        .route("/me", get(me))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<Registration>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    let password = PasswordHash::derive(&body.password);
    // Self-registration never grants the staff flag; staff accounts are
    // provisioned out-of-band.
    let identity = Identity {
        id: IdentityId::new(),
        username: body.username.trim().to_string(),
        email: body.email.trim().to_string(),
        first_name: body.first_name.trim().to_string(),
        last_name: body.last_name.trim().to_string(),
        is_staff: false,
        created_at: Utc::now(),
    };

    if let Err(e) = services.store.insert_identity(&identity, &password).await {
        return match e {
            StoreError::Conflict(_) => errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_failed",
                "username already taken",
            ),
            other => errors::store_error_to_response(other),
        };
    }

    // Post-commit hook: a failure here is reported, but the identity above
    // stays committed.
    if let Err(e) = ensure_patient_profile(services.store.as_ref(), &identity, Utc::now()).await {
        tracing::error!(error = %e, identity_id = %identity.id, "profile linking failed after identity commit");
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "profile linking failed",
        );
    }

    (StatusCode::CREATED, Json(dto::identity_to_json(&identity))).into_response()
}

pub async fn token(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    let identity = match verify_credentials(&services, &body).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let now = Utc::now();
    let access = match services.tokens.issue(&identity, now, services.token_ttl) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "token encoding failed");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal error",
            );
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "access": access,
            "expires_at": now + services.token_ttl,
        })),
    )
        .into_response()
}

pub async fn staff_login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    let identity = match verify_credentials(&services, &body).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    if !identity.is_staff {
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "staff capability required",
        );
    }

    let session = match services
        .store
        .create_session(identity.id, Utc::now(), services.session_ttl)
        .await
    {
        Ok(session) => session,
        Err(e) => return errors::store_error_to_response(e),
    };

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        middleware::STAFF_SESSION_COOKIE,
        session
    );

    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "detail": "staff session established" })),
    )
        .into_response()
}

pub async fn staff_logout(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    if let Some(session) = middleware::extract_session_cookie(&headers) {
        if let Err(e) = services.store.revoke_session(&session).await {
            return errors::store_error_to_response(e);
        }
    }

    let clear = format!(
        "{}=; Path=/; HttpOnly; Max-Age=0",
        middleware::STAFF_SESSION_COOKIE
    );
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, clear)]).into_response()
}

/// The caller's identity document.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<Caller>,
) -> axum::response::Response {
    let Some(identity_id) = caller.identity_id() else {
        return errors::deny_to_response(Deny::Unauthenticated);
    };

    match services.store.identity_by_id(identity_id).await {
        Ok(Some(identity)) => {
            (StatusCode::OK, Json(dto::identity_to_json(&identity))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "identity not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

async fn verify_credentials(
    services: &AppServices,
    body: &dto::CredentialsRequest,
) -> Result<Identity, axum::response::Response> {
    let found = services
        .store
        .identity_by_username(&body.username)
        .await
        .map_err(errors::store_error_to_response)?;

    match found {
        Some((identity, hash)) if hash.verify(&body.password) => Ok(identity),
        // Same response whether the username or the password was wrong.
        _ => Err(errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "invalid username or password",
        )),
    }
}
