//! Request DTOs and JSON response shaping.
//!
//! Creation/patch inputs deserialize straight into the domain input types
//! (`Registration`, `NewHistoryEntry`, `AppointmentRequest`, ...); only the
//! auth endpoints need their own request structs. Responses are shaped with
//! `serde_json::json!` rather than dedicated response types.

use serde::Deserialize;
use serde_json::{Value, json};

use dentalis_auth::Identity;
use dentalis_content::{BlogPost, FaqCategory, FaqItem, Review};
use dentalis_patients::{Appointment, DentalHistory, Patient, Prescription};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn identity_to_json(identity: &Identity) -> Value {
    json!({
        "id": identity.id.to_string(),
        "username": identity.username,
        "email": identity.email,
        "first_name": identity.first_name,
        "last_name": identity.last_name,
        "is_staff": identity.is_staff,
    })
}

/// Full profile document: identity details plus nested history, newest visit
/// first, prescriptions nested under each entry.
pub fn profile_to_json(
    patient: &Patient,
    identity: Option<&Identity>,
    history: &[(DentalHistory, Vec<Prescription>)],
) -> Value {
    json!({
        "id": patient.id.to_string(),
        "user": identity.map(identity_to_json),
        "phone": patient.phone,
        "date_of_birth": patient.date_of_birth,
        "added_at": patient.added_at,
        "history": history
            .iter()
            .map(|(entry, prescriptions)| history_to_json(entry, prescriptions))
            .collect::<Vec<_>>(),
    })
}

pub fn history_to_json(entry: &DentalHistory, prescriptions: &[Prescription]) -> Value {
    json!({
        "id": entry.id.to_string(),
        "patient": entry.patient.to_string(),
        "visit_date": entry.visit_date,
        "notes": entry.notes,
        "treatment_provided": entry.treatment_provided,
        "prescriptions": prescriptions.iter().map(prescription_to_json).collect::<Vec<_>>(),
    })
}

pub fn prescription_to_json(prescription: &Prescription) -> Value {
    json!({
        "id": prescription.id.to_string(),
        "history": prescription.history.to_string(),
        "medicine_name": prescription.medicine_name,
        "dosage": prescription.dosage,
        "instructions": prescription.instructions,
    })
}

pub fn appointment_to_json(appointment: &Appointment) -> Value {
    json!({
        "id": appointment.id.to_string(),
        "patient": appointment.patient.to_string(),
        "service_requested": appointment.service_requested,
        "date": appointment.date,
        "time": appointment.time,
        "notes": appointment.notes,
        "status": appointment.status.as_str(),
        "created_at": appointment.created_at,
    })
}

pub fn review_to_json(review: &Review) -> Value {
    json!({
        "id": review.id.to_string(),
        "patient_name": review.patient_name,
        "review_text": review.review_text,
        "rating": review.rating,
    })
}

pub fn post_to_json(post: &BlogPost) -> Value {
    json!({
        "id": post.id.to_string(),
        "slug": post.slug.as_str(),
        "title": post.title,
        "body": post.body,
        "published_at": post.published_at,
    })
}

pub fn faq_category_to_json(category: &FaqCategory, items: &[FaqItem]) -> Value {
    json!({
        "id": category.id.to_string(),
        "title": category.title,
        "items": items
            .iter()
            .map(|item| json!({
                "id": item.id.to_string(),
                "question": item.question,
                "answer": item.answer,
            }))
            .collect::<Vec<_>>(),
    })
}
