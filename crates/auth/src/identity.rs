//! Identity records and registration input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dentalis_core::{DomainError, DomainResult, IdentityId};

/// An authenticable account record, staff or patient-role.
///
/// # Invariants
/// - `username` is unique across the store.
/// - A non-staff identity has exactly one linked patient profile (created
///   reactively after the identity commit, see `dentalis-store`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Display name used wherever a human-readable label is needed: the full
    /// name when any name field is set, the username otherwise.
    ///
    /// Snapshot fields (e.g. `Review.patient_name`) capture this value at
    /// write time and never recompute it.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Registration input for a new identity.
///
/// Carries the plaintext password; hashing happens at the persistence
/// boundary, never here.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Registration {
    /// Field-level validation, surfaced per-field to the caller.
    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username must not be empty"));
        }
        if self.username.contains(char::is_whitespace) {
            return Err(DomainError::validation("username must not contain whitespace"));
        }
        if self.password.len() < 8 {
            return Err(DomainError::validation(
                "password must be at least 8 characters",
            ));
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(first: &str, last: &str, username: &str) -> Identity {
        Identity {
            id: IdentityId::new(),
            username: username.to_string(),
            email: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_prefers_full_name() {
        let id = identity("Kiah", "Nguyen", "kiah");
        assert_eq!(id.display_name(), "Kiah Nguyen");
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let id = identity("", "", "kiah");
        assert_eq!(id.display_name(), "kiah");
    }

    #[test]
    fn display_name_handles_single_name_field() {
        let id = identity("Kiah", "", "kiah");
        assert_eq!(id.display_name(), "Kiah");
    }

    #[test]
    fn registration_rejects_short_password() {
        let reg = Registration {
            username: "kiah".to_string(),
            password: "pw123".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(matches!(reg.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn registration_rejects_blank_username() {
        let reg = Registration {
            username: "  ".to_string(),
            password: "pw123456".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(reg.validate().is_err());
    }

    #[test]
    fn registration_accepts_minimal_input() {
        let reg = Registration {
            username: "kiah".to_string(),
            password: "pw123456".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(reg.validate().is_ok());
    }
}
