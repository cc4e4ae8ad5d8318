//! Bearer-token claims model and HS256 codec.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dentalis_core::IdentityId;

use crate::Identity;

/// Token claims (transport-agnostic).
///
/// This is the minimal set of claims the API expects once a token has been
/// decoded and verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject / identity identifier.
    pub sub: IdentityId,

    /// Staff capability flag carried by the token.
    pub staff: bool,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("malformed token")]
    Malformed,
}

/// Deterministically validate token claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`Hs256Tokens`].
pub fn validate_claims(claims: &AuthClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// Validation half of the token codec, object-safe for middleware state.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, TokenValidationError>;
}

/// HS256 token codec over a shared secret.
pub struct Hs256Tokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256Tokens {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is a chrono timestamp in the claims, checked by
        // `validate_claims` rather than jsonwebtoken's numeric `exp` handling.
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a bearer token for an authenticated identity.
    pub fn issue(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = AuthClaims {
            sub: identity.id,
            staff: identity.is_staff,
            issued_at: now,
            expires_at: now + ttl,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }
}

impl TokenValidator for Hs256Tokens {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<AuthClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<AuthClaims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenValidationError::Malformed)?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_identity(staff: bool) -> Identity {
        Identity {
            id: IdentityId::new(),
            username: "kiah".to_string(),
            email: "kiah@example.com".to_string(),
            first_name: "Kiah".to_string(),
            last_name: "Nguyen".to_string(),
            is_staff: staff,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issue_then_validate_round_trip() {
        let tokens = Hs256Tokens::new(b"test-secret");
        let identity = test_identity(false);
        let now = Utc::now();

        let token = tokens.issue(&identity, now, Duration::minutes(10)).unwrap();
        let claims = tokens.validate(&token, now).unwrap();

        assert_eq!(claims.sub, identity.id);
        assert!(!claims.staff);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = Hs256Tokens::new(b"test-secret");
        let identity = test_identity(false);
        let issued = Utc::now() - Duration::hours(2);

        let token = tokens
            .issue(&identity, issued, Duration::minutes(10))
            .unwrap();
        let result = tokens.validate(&token, Utc::now());

        assert_eq!(result.unwrap_err(), TokenValidationError::Expired);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let tokens = Hs256Tokens::new(b"test-secret");
        let other = Hs256Tokens::new(b"other-secret");
        let identity = test_identity(true);
        let now = Utc::now();

        let token = tokens.issue(&identity, now, Duration::minutes(10)).unwrap();
        let result = other.validate(&token, now);

        assert_eq!(result.unwrap_err(), TokenValidationError::Malformed);
    }

    #[test]
    fn inverted_time_window_is_rejected() {
        let now = Utc::now();
        let claims = AuthClaims {
            sub: IdentityId::new(),
            staff: false,
            issued_at: now,
            expires_at: now - Duration::minutes(1),
        };
        assert_eq!(
            validate_claims(&claims, now).unwrap_err(),
            TokenValidationError::InvalidTimeWindow
        );
    }
}
