//! Caller resolution middleware.
//!
//! Two parallel authentication mechanisms feed one [`Caller`]: bearer tokens
//! (patients) and the `staff_session` cookie (staff dashboard). Handlers and
//! the policy evaluator never see which mechanism was used.
//!
//! A *present but invalid* bearer token is rejected outright with 401, even
//! for public routes — an explicit API credential that fails verification is
//! an authentication failure, not anonymity. A stale session cookie, by
//! contrast, degrades to an anonymous caller: browsers keep sending cookies
//! long after the session is gone.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use dentalis_auth::{Caller, TokenValidator};
use dentalis_store::{IdentityStore, SessionStore};

use crate::app::{errors, services::AppServices};

pub const STAFF_SESSION_COOKIE: &str = "staff_session";

#[derive(Clone)]
pub struct AuthState {
    pub services: Arc<AppServices>,
}

pub async fn resolve_caller(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let services = &state.services;

    let caller = if let Some(token) = extract_bearer(req.headers()) {
        match services.tokens.validate(token, Utc::now()) {
            Ok(claims) => Caller::known(claims.sub, claims.staff),
            Err(err) => {
                tracing::debug!(error = %err, "rejected bearer token");
                return Err(errors::json_error(
                    StatusCode::UNAUTHORIZED,
                    "unauthenticated",
                    "invalid or expired token",
                ));
            }
        }
    } else if let Some(session) = extract_session_cookie(req.headers()) {
        resolve_session_caller(services, &session).await
    } else {
        Caller::Anonymous
    };

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

async fn resolve_session_caller(services: &AppServices, session: &str) -> Caller {
    let identity_id = match services.store.resolve_session(session, Utc::now()).await {
        Ok(Some(id)) => id,
        Ok(None) => return Caller::Anonymous,
        Err(err) => {
            tracing::error!(error = %err, "session lookup failed");
            return Caller::Anonymous;
        }
    };

    match services.store.identity_by_id(identity_id).await {
        Ok(Some(identity)) => Caller::known(identity.id, identity.is_staff),
        Ok(None) => Caller::Anonymous,
        Err(err) => {
            tracing::error!(error = %err, "identity lookup failed");
            Caller::Anonymous
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

pub(crate) fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == STAFF_SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction_trims_and_rejects_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer  abc123 "),
        );
        assert_eq!(extract_bearer(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; staff_session=tok123; lang=en"),
        );
        assert_eq!(extract_session_cookie(&headers), Some("tok123".to_string()));
    }

    #[test]
    fn missing_session_cookie_is_none() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(extract_session_cookie(&headers), None);
        assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
    }
}
