//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// One variant per outcome the HTTP layer distinguishes: callers without a
/// valid credential, callers with insufficient capability, unresolvable
/// resources, payloads failing field constraints, and collaborator failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No credential presented, or the presented credential is invalid.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Credential is valid but the capability is insufficient.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An id/slug does not resolve, or a self-scoped lookup has no linked
    /// patient profile.
    #[error("not found")]
    NotFound,

    /// A payload failed field constraints (missing field, out-of-range
    /// rating, duplicate username/slug).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Store or collaborator failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
