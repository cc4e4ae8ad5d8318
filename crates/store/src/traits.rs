//! Repository contracts.
//!
//! Implementations must provide:
//! - unique-constraint enforcement (`Identity.username`, `BlogPost.slug`,
//!   one patient profile per identity), reported as [`StoreError::Conflict`];
//! - cascade deletes: patient → history → prescriptions, patient →
//!   appointments, history → prescriptions, each delete all-or-nothing;
//! - identity deletion nulls `Review.identity` while keeping the
//!   `patient_name` snapshot;
//! - row-level atomicity for single-row partial updates (the `update_*`
//!   methods take the patch, not a pre-read row, so there is no lost-update
//!   window between read and write).

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use dentalis_auth::{Identity, PasswordHash};
use dentalis_content::{BlogPost, FaqCategory, FaqItem, Review, Slug};
use dentalis_core::{
    AppointmentId, FaqCategoryId, HistoryId, IdentityId, PatientId, PrescriptionId,
};
use dentalis_patients::{
    Appointment, AppointmentPatch, DentalHistory, HistoryPatch, Patient, Prescription,
    PrescriptionPatch,
};

use crate::StoreResult;

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert_identity(
        &self,
        identity: &Identity,
        password: &PasswordHash,
    ) -> StoreResult<()>;

    async fn identity_by_id(&self, id: IdentityId) -> StoreResult<Option<Identity>>;

    async fn identity_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<(Identity, PasswordHash)>>;

    /// Delete an identity: the linked patient profile cascades away, reviews
    /// keep their snapshot with the reference nulled.
    async fn delete_identity(&self, id: IdentityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn insert_patient(&self, patient: &Patient) -> StoreResult<()>;
    async fn patient_by_id(&self, id: PatientId) -> StoreResult<Option<Patient>>;
    async fn patient_by_identity(&self, identity: IdentityId) -> StoreResult<Option<Patient>>;
    async fn list_patients(&self) -> StoreResult<Vec<Patient>>;

    /// Cascade delete: history entries, their prescriptions, and
    /// appointments go with the profile, atomically.
    async fn delete_patient(&self, id: PatientId) -> StoreResult<bool>;

    async fn insert_history(&self, entry: &DentalHistory) -> StoreResult<()>;
    async fn history_by_id(&self, id: HistoryId) -> StoreResult<Option<DentalHistory>>;
    async fn list_history(&self) -> StoreResult<Vec<DentalHistory>>;

    /// Entries for one patient, newest `visit_date` first.
    async fn history_for_patient(&self, patient: PatientId) -> StoreResult<Vec<DentalHistory>>;

    async fn update_history(
        &self,
        id: HistoryId,
        patch: HistoryPatch,
    ) -> StoreResult<Option<DentalHistory>>;
    async fn delete_history(&self, id: HistoryId) -> StoreResult<bool>;

    async fn insert_prescription(&self, prescription: &Prescription) -> StoreResult<()>;
    async fn prescription_by_id(&self, id: PrescriptionId) -> StoreResult<Option<Prescription>>;
    async fn list_prescriptions(&self) -> StoreResult<Vec<Prescription>>;
    async fn prescriptions_for_history(&self, history: HistoryId)
        -> StoreResult<Vec<Prescription>>;
    async fn update_prescription(
        &self,
        id: PrescriptionId,
        patch: PrescriptionPatch,
    ) -> StoreResult<Option<Prescription>>;
    async fn delete_prescription(&self, id: PrescriptionId) -> StoreResult<bool>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_appointment(&self, appointment: &Appointment) -> StoreResult<()>;
    async fn appointment_by_id(&self, id: AppointmentId) -> StoreResult<Option<Appointment>>;
    async fn list_appointments(&self) -> StoreResult<Vec<Appointment>>;
    async fn appointments_for_patient(&self, patient: PatientId)
        -> StoreResult<Vec<Appointment>>;
    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> StoreResult<Option<Appointment>>;
    async fn delete_appointment(&self, id: AppointmentId) -> StoreResult<bool>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert_review(&self, review: &Review) -> StoreResult<()>;

    /// All reviews, newest first.
    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_faq_categories(&self) -> StoreResult<Vec<FaqCategory>>;
    async fn faq_items_for_category(&self, category: FaqCategoryId) -> StoreResult<Vec<FaqItem>>;
    async fn list_posts(&self) -> StoreResult<Vec<BlogPost>>;
    async fn post_by_slug(&self, slug: &Slug) -> StoreResult<Option<BlogPost>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Open a staff session; returns the opaque session token.
    async fn create_session(
        &self,
        identity: IdentityId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> StoreResult<String>;

    /// Resolve a session token to its identity, if present and unexpired.
    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<IdentityId>>;

    async fn revoke_session(&self, token: &str) -> StoreResult<bool>;
}

/// The full persistence surface the API is wired against.
pub trait ClinicStore:
    IdentityStore + PatientStore + AppointmentStore + ReviewStore + ContentStore + SessionStore
{
}

impl<T> ClinicStore for T where
    T: IdentityStore + PatientStore + AppointmentStore + ReviewStore + ContentStore + SessionStore
{
}
