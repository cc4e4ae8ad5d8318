//! Store error model and sqlx error mapping.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure at the persistence boundary.
///
/// Constraint violations are split out so the API layer can surface them as
/// validation failures instead of opaque 500s.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique-constraint violation (duplicate username, slug, or a second
    /// profile for one identity).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Foreign-key violation: the referenced parent row does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Backend failure (connection loss, malformed row, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Map a sqlx error to the store taxonomy.
///
/// | PostgreSQL code | Meaning | Mapped to |
/// |---|---|---|
/// | `23505` | unique violation | `Conflict` |
/// | `23503` | foreign-key violation | `InvalidReference` |
/// | anything else | backend failure | `Backend` |
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => {
                return StoreError::Conflict(format!("{operation}: {}", db_err.message()));
            }
            Some("23503") => {
                return StoreError::InvalidReference(format!("{operation}: {}", db_err.message()));
            }
            _ => {}
        }
    }
    StoreError::Backend(format!("{operation}: {err}"))
}
