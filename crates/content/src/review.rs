//! Public reviews with the ownership-snapshot rule.

use serde::{Deserialize, Serialize};

use dentalis_auth::Identity;
use dentalis_core::{DomainError, DomainResult, IdentityId, ReviewId};

pub const RATING_MIN: i16 = 1;
pub const RATING_MAX: i16 = 5;

/// A public review.
///
/// `identity` is a weak back-reference: it is nulled when the identity is
/// deleted while the `patient_name` snapshot persists. The snapshot is
/// captured at creation time and never recomputed, even if the identity's
/// name changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub identity: Option<IdentityId>,
    pub patient_name: String,
    pub review_text: String,
    pub rating: i16,
}

fn default_rating() -> i16 {
    RATING_MAX
}

/// What a caller submits. Any `patient_name` in the request body is dropped
/// at deserialization; the handler supplies the snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub review_text: String,
    #[serde(default = "default_rating")]
    pub rating: i16,
}

impl NewReview {
    pub fn validate(&self) -> DomainResult<()> {
        if self.review_text.trim().is_empty() {
            return Err(DomainError::validation("review_text must not be empty"));
        }
        if !(RATING_MIN..=RATING_MAX).contains(&self.rating) {
            return Err(DomainError::validation(format!(
                "rating must be between {RATING_MIN} and {RATING_MAX}"
            )));
        }
        Ok(())
    }
}

impl Review {
    /// Create a review on behalf of an authenticated identity, snapshotting
    /// its display name at write time.
    pub fn submitted_by(identity: &Identity, input: NewReview) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id: ReviewId::new(),
            identity: Some(identity.id),
            patient_name: identity.display_name(),
            review_text: input.review_text,
            rating: input.rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn identity(first: &str, last: &str) -> Identity {
        Identity {
            id: IdentityId::new(),
            username: "kiah".to_string(),
            email: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    fn input(rating: i16) -> NewReview {
        NewReview {
            review_text: "Great clinic, friendly staff.".to_string(),
            rating,
        }
    }

    #[test]
    fn snapshot_uses_full_name_when_present() {
        let review = Review::submitted_by(&identity("Kiah", "Nguyen"), input(5)).unwrap();
        assert_eq!(review.patient_name, "Kiah Nguyen");
    }

    #[test]
    fn snapshot_falls_back_to_username() {
        let review = Review::submitted_by(&identity("", ""), input(4)).unwrap();
        assert_eq!(review.patient_name, "kiah");
    }

    #[test]
    fn snapshot_survives_identity_rename() {
        let mut author = identity("Kiah", "Nguyen");
        let review = Review::submitted_by(&author, input(5)).unwrap();

        author.first_name = "Mia".to_string();

        // The stored snapshot is untouched by the rename.
        assert_eq!(review.patient_name, "Kiah Nguyen");
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert!(Review::submitted_by(&identity("Kiah", ""), input(0)).is_err());
        assert!(Review::submitted_by(&identity("Kiah", ""), input(6)).is_err());
    }

    #[test]
    fn rating_defaults_to_max() {
        let parsed: NewReview =
            serde_json::from_str(r#"{"review_text": "Lovely visit."}"#).unwrap();
        assert_eq!(parsed.rating, RATING_MAX);
    }

    #[test]
    fn body_supplied_patient_name_is_ignored() {
        let parsed: NewReview = serde_json::from_str(
            r#"{"review_text": "ok", "rating": 3, "patient_name": "Impostor"}"#,
        )
        .unwrap();
        let review = Review::submitted_by(&identity("Kiah", "Nguyen"), parsed).unwrap();
        assert_eq!(review.patient_name, "Kiah Nguyen");
    }
}
