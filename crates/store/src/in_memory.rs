//! In-memory store for tests and local development.
//!
//! Mirrors the relational semantics the Postgres implementation gets from
//! the schema: unique constraints, foreign keys, cascade deletes, and the
//! null-on-identity-delete rule for reviews. Every operation takes the write
//! lock for its whole read/modify/write sequence, which gives the same
//! atomicity the database provides per row.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use dentalis_auth::{Identity, PasswordHash};
use dentalis_content::{BlogPost, FaqCategory, FaqItem, Review, Slug};
use dentalis_core::{
    AppointmentId, FaqCategoryId, FaqItemId, HistoryId, IdentityId, PatientId, PostId,
    PrescriptionId, ReviewId,
};
use dentalis_patients::{
    Appointment, AppointmentPatch, DentalHistory, HistoryPatch, Patient, Prescription,
    PrescriptionPatch,
};

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    AppointmentStore, ContentStore, IdentityStore, PatientStore, ReviewStore, SessionStore,
};

#[derive(Default)]
struct State {
    identities: HashMap<IdentityId, (Identity, PasswordHash)>,
    patients: HashMap<PatientId, Patient>,
    history: HashMap<HistoryId, DentalHistory>,
    prescriptions: HashMap<PrescriptionId, Prescription>,
    appointments: HashMap<AppointmentId, Appointment>,
    reviews: HashMap<ReviewId, Review>,
    faq_categories: HashMap<FaqCategoryId, FaqCategory>,
    faq_items: HashMap<FaqItemId, FaqItem>,
    posts: HashMap<PostId, BlogPost>,
    sessions: HashMap<String, (IdentityId, DateTime<Utc>)>,
}

/// HashMap-backed [`crate::ClinicStore`].
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blog post (content is managed out-of-band in production).
    pub fn seed_post(&self, slug: &str, title: &str, body: &str) -> StoreResult<BlogPost> {
        let slug: Slug = slug
            .parse()
            .map_err(|e| StoreError::Backend(format!("seed_post: {e}")))?;
        let mut state = self.state.write().expect("store lock poisoned");
        if state.posts.values().any(|p| p.slug == slug) {
            return Err(StoreError::Conflict(format!("duplicate slug: {slug}")));
        }
        let post = BlogPost {
            id: PostId::new(),
            slug,
            title: title.to_string(),
            body: body.to_string(),
            published_at: Utc::now(),
        };
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    /// Seed an FAQ category with its items.
    pub fn seed_faq_category(&self, title: &str, items: &[(&str, &str)]) -> FaqCategory {
        let mut state = self.state.write().expect("store lock poisoned");
        let category = FaqCategory {
            id: FaqCategoryId::new(),
            title: title.to_string(),
        };
        state.faq_categories.insert(category.id, category.clone());
        for (question, answer) in items {
            let item = FaqItem {
                id: FaqItemId::new(),
                category: category.id,
                question: question.to_string(),
                answer: answer.to_string(),
            };
            state.faq_items.insert(item.id, item);
        }
        category
    }
}

#[async_trait]
impl IdentityStore for InMemoryStore {
    async fn insert_identity(
        &self,
        identity: &Identity,
        password: &PasswordHash,
    ) -> StoreResult<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        if state
            .identities
            .values()
            .any(|(existing, _)| existing.username == identity.username)
        {
            return Err(StoreError::Conflict(format!(
                "duplicate username: {}",
                identity.username
            )));
        }
        state
            .identities
            .insert(identity.id, (identity.clone(), password.clone()));
        Ok(())
    }

    async fn identity_by_id(&self, id: IdentityId) -> StoreResult<Option<Identity>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state.identities.get(&id).map(|(identity, _)| identity.clone()))
    }

    async fn identity_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<(Identity, PasswordHash)>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .identities
            .values()
            .find(|(identity, _)| identity.username == username)
            .cloned())
    }

    async fn delete_identity(&self, id: IdentityId) -> StoreResult<bool> {
        let mut state = self.state.write().expect("store lock poisoned");
        if state.identities.remove(&id).is_none() {
            return Ok(false);
        }

        // Linked patient profile cascades away with everything under it.
        if let Some(patient_id) = state
            .patients
            .values()
            .find(|p| p.identity == id)
            .map(|p| p.id)
        {
            delete_patient_cascade(&mut state, patient_id);
        }

        // Reviews keep the snapshot; only the back-reference is dropped.
        for review in state.reviews.values_mut() {
            if review.identity == Some(id) {
                review.identity = None;
            }
        }

        state.sessions.retain(|_, (owner, _)| *owner != id);
        Ok(true)
    }
}

fn delete_patient_cascade(state: &mut State, id: PatientId) -> bool {
    if state.patients.remove(&id).is_none() {
        return false;
    }
    let history_ids: Vec<HistoryId> = state
        .history
        .values()
        .filter(|h| h.patient == id)
        .map(|h| h.id)
        .collect();
    for history_id in &history_ids {
        state.history.remove(history_id);
    }
    state
        .prescriptions
        .retain(|_, p| !history_ids.contains(&p.history));
    state.appointments.retain(|_, a| a.patient != id);
    true
}

#[async_trait]
impl PatientStore for InMemoryStore {
    async fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        if !state.identities.contains_key(&patient.identity) {
            return Err(StoreError::InvalidReference(format!(
                "unknown identity: {}",
                patient.identity
            )));
        }
        if state
            .patients
            .values()
            .any(|existing| existing.identity == patient.identity)
        {
            return Err(StoreError::Conflict(format!(
                "identity already has a profile: {}",
                patient.identity
            )));
        }
        state.patients.insert(patient.id, patient.clone());
        Ok(())
    }

    async fn patient_by_id(&self, id: PatientId) -> StoreResult<Option<Patient>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state.patients.get(&id).cloned())
    }

    async fn patient_by_identity(&self, identity: IdentityId) -> StoreResult<Option<Patient>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .patients
            .values()
            .find(|p| p.identity == identity)
            .cloned())
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut patients: Vec<Patient> = state.patients.values().cloned().collect();
        patients.sort_by_key(|p| *p.id.as_uuid());
        Ok(patients)
    }

    async fn delete_patient(&self, id: PatientId) -> StoreResult<bool> {
        let mut state = self.state.write().expect("store lock poisoned");
        Ok(delete_patient_cascade(&mut state, id))
    }

    async fn insert_history(&self, entry: &DentalHistory) -> StoreResult<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        if !state.patients.contains_key(&entry.patient) {
            return Err(StoreError::InvalidReference(format!(
                "unknown patient: {}",
                entry.patient
            )));
        }
        state.history.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn history_by_id(&self, id: HistoryId) -> StoreResult<Option<DentalHistory>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state.history.get(&id).cloned())
    }

    async fn list_history(&self) -> StoreResult<Vec<DentalHistory>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut entries: Vec<DentalHistory> = state.history.values().cloned().collect();
        entries.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
        Ok(entries)
    }

    async fn history_for_patient(&self, patient: PatientId) -> StoreResult<Vec<DentalHistory>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut entries: Vec<DentalHistory> = state
            .history
            .values()
            .filter(|h| h.patient == patient)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
        Ok(entries)
    }

    async fn update_history(
        &self,
        id: HistoryId,
        patch: HistoryPatch,
    ) -> StoreResult<Option<DentalHistory>> {
        let mut state = self.state.write().expect("store lock poisoned");
        let Some(entry) = state.history.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply(entry);
        Ok(Some(entry.clone()))
    }

    async fn delete_history(&self, id: HistoryId) -> StoreResult<bool> {
        let mut state = self.state.write().expect("store lock poisoned");
        if state.history.remove(&id).is_none() {
            return Ok(false);
        }
        state.prescriptions.retain(|_, p| p.history != id);
        Ok(true)
    }

    async fn insert_prescription(&self, prescription: &Prescription) -> StoreResult<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        if !state.history.contains_key(&prescription.history) {
            return Err(StoreError::InvalidReference(format!(
                "unknown history entry: {}",
                prescription.history
            )));
        }
        state
            .prescriptions
            .insert(prescription.id, prescription.clone());
        Ok(())
    }

    async fn prescription_by_id(&self, id: PrescriptionId) -> StoreResult<Option<Prescription>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state.prescriptions.get(&id).cloned())
    }

    async fn list_prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut prescriptions: Vec<Prescription> = state.prescriptions.values().cloned().collect();
        prescriptions.sort_by_key(|p| *p.id.as_uuid());
        Ok(prescriptions)
    }

    async fn prescriptions_for_history(
        &self,
        history: HistoryId,
    ) -> StoreResult<Vec<Prescription>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut prescriptions: Vec<Prescription> = state
            .prescriptions
            .values()
            .filter(|p| p.history == history)
            .cloned()
            .collect();
        prescriptions.sort_by_key(|p| *p.id.as_uuid());
        Ok(prescriptions)
    }

    async fn update_prescription(
        &self,
        id: PrescriptionId,
        patch: PrescriptionPatch,
    ) -> StoreResult<Option<Prescription>> {
        let mut state = self.state.write().expect("store lock poisoned");
        let Some(prescription) = state.prescriptions.get_mut(&id) else {
            return Ok(None);
        };
        // Patches are validated at the API boundary.
        patch
            .apply(prescription)
            .map_err(|e| StoreError::Backend(format!("update_prescription: {e}")))?;
        Ok(Some(prescription.clone()))
    }

    async fn delete_prescription(&self, id: PrescriptionId) -> StoreResult<bool> {
        let mut state = self.state.write().expect("store lock poisoned");
        Ok(state.prescriptions.remove(&id).is_some())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn insert_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        if !state.patients.contains_key(&appointment.patient) {
            return Err(StoreError::InvalidReference(format!(
                "unknown patient: {}",
                appointment.patient
            )));
        }
        state
            .appointments
            .insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn appointment_by_id(&self, id: AppointmentId) -> StoreResult<Option<Appointment>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state.appointments.get(&id).cloned())
    }

    async fn list_appointments(&self) -> StoreResult<Vec<Appointment>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut appointments: Vec<Appointment> = state.appointments.values().cloned().collect();
        appointments.sort_by_key(|a| *a.id.as_uuid());
        Ok(appointments)
    }

    async fn appointments_for_patient(
        &self,
        patient: PatientId,
    ) -> StoreResult<Vec<Appointment>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut appointments: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|a| a.patient == patient)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| *a.id.as_uuid());
        Ok(appointments)
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> StoreResult<Option<Appointment>> {
        let mut state = self.state.write().expect("store lock poisoned");
        let Some(appointment) = state.appointments.get_mut(&id) else {
            return Ok(None);
        };
        // Patches are validated at the API boundary.
        patch
            .apply(appointment)
            .map_err(|e| StoreError::Backend(format!("update_appointment: {e}")))?;
        Ok(Some(appointment.clone()))
    }

    async fn delete_appointment(&self, id: AppointmentId) -> StoreResult<bool> {
        let mut state = self.state.write().expect("store lock poisoned");
        Ok(state.appointments.remove(&id).is_some())
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn insert_review(&self, review: &Review) -> StoreResult<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        if let Some(identity) = review.identity {
            if !state.identities.contains_key(&identity) {
                return Err(StoreError::InvalidReference(format!(
                    "unknown identity: {identity}"
                )));
            }
        }
        state.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut reviews: Vec<Review> = state.reviews.values().cloned().collect();
        // UUIDv7 ids are time-ordered, so id-descending is newest first.
        reviews.sort_by(|a, b| b.id.as_uuid().cmp(a.id.as_uuid()));
        Ok(reviews)
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn list_faq_categories(&self) -> StoreResult<Vec<FaqCategory>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut categories: Vec<FaqCategory> = state.faq_categories.values().cloned().collect();
        categories.sort_by_key(|c| *c.id.as_uuid());
        Ok(categories)
    }

    async fn faq_items_for_category(&self, category: FaqCategoryId) -> StoreResult<Vec<FaqItem>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut items: Vec<FaqItem> = state
            .faq_items
            .values()
            .filter(|i| i.category == category)
            .cloned()
            .collect();
        items.sort_by_key(|i| *i.id.as_uuid());
        Ok(items)
    }

    async fn list_posts(&self) -> StoreResult<Vec<BlogPost>> {
        let state = self.state.read().expect("store lock poisoned");
        let mut posts: Vec<BlogPost> = state.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn post_by_slug(&self, slug: &Slug) -> StoreResult<Option<BlogPost>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state.posts.values().find(|p| &p.slug == slug).cloned())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn create_session(
        &self,
        identity: IdentityId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> StoreResult<String> {
        let mut state = self.state.write().expect("store lock poisoned");
        let token = Uuid::now_v7().simple().to_string();
        state.sessions.insert(token.clone(), (identity, now + ttl));
        Ok(token)
    }

    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<IdentityId>> {
        let state = self.state.read().expect("store lock poisoned");
        Ok(state
            .sessions
            .get(token)
            .filter(|(_, expires_at)| now < *expires_at)
            .map(|(identity, _)| *identity))
    }

    async fn revoke_session(&self, token: &str) -> StoreResult<bool> {
        let mut state = self.state.write().expect("store lock poisoned");
        Ok(state.sessions.remove(token).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dentalis_content::NewReview;
    use dentalis_patients::{AppointmentRequest, NewHistoryEntry, NewPrescription};

    fn identity(username: &str, staff: bool) -> Identity {
        Identity {
            id: IdentityId::new(),
            username: username.to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: staff,
            created_at: Utc::now(),
        }
    }

    async fn stored_identity(store: &InMemoryStore, username: &str, staff: bool) -> Identity {
        let id = identity(username, staff);
        store
            .insert_identity(&id, &PasswordHash::derive("pw123456"))
            .await
            .unwrap();
        id
    }

    async fn stored_patient(store: &InMemoryStore, username: &str) -> Patient {
        let id = stored_identity(store, username, false).await;
        let patient = Patient::for_identity(id.id, Utc::now());
        store.insert_patient(&patient).await.unwrap();
        patient
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = InMemoryStore::new();
        stored_identity(&store, "kiah", false).await;
        let result = store
            .insert_identity(&identity("kiah", false), &PasswordHash::derive("pw123456"))
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn one_profile_per_identity() {
        let store = InMemoryStore::new();
        let patient = stored_patient(&store, "kiah").await;
        let second = Patient::for_identity(patient.identity, Utc::now());
        let result = store.insert_patient(&second).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn patient_delete_cascades_fully() {
        let store = InMemoryStore::new();
        let patient = stored_patient(&store, "kiah").await;

        let entry = DentalHistory::create(
            NewHistoryEntry {
                patient: patient.id,
                visit_date: None,
                notes: String::new(),
                treatment_provided: String::new(),
            },
            Utc::now(),
        );
        store.insert_history(&entry).await.unwrap();

        let prescription = Prescription::create(NewPrescription {
            history: entry.id,
            medicine_name: "Amoxicillin".to_string(),
            dosage: "500mg".to_string(),
            instructions: String::new(),
        })
        .unwrap();
        store.insert_prescription(&prescription).await.unwrap();

        let appointment = Appointment::book(
            patient.id,
            AppointmentRequest {
                service_requested: "Cleaning".to_string(),
                date: chrono::NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
                time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                notes: String::new(),
            },
            Utc::now(),
        )
        .unwrap();
        store.insert_appointment(&appointment).await.unwrap();

        assert!(store.delete_patient(patient.id).await.unwrap());

        assert!(store.history_by_id(entry.id).await.unwrap().is_none());
        assert!(store
            .prescription_by_id(prescription.id)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .appointment_by_id(appointment.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn identity_delete_nulls_review_reference_keeps_snapshot() {
        let store = InMemoryStore::new();
        let mut author = identity("kiah", false);
        author.first_name = "Kiah".to_string();
        author.last_name = "Nguyen".to_string();
        store
            .insert_identity(&author, &PasswordHash::derive("pw123456"))
            .await
            .unwrap();

        let review = Review::submitted_by(
            &author,
            NewReview {
                review_text: "Wonderful care.".to_string(),
                rating: 5,
            },
        )
        .unwrap();
        store.insert_review(&review).await.unwrap();

        assert!(store.delete_identity(author.id).await.unwrap());

        let reviews = store.list_reviews().await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].identity, None);
        assert_eq!(reviews[0].patient_name, "Kiah Nguyen");
    }

    #[tokio::test]
    async fn history_lists_newest_visit_first() {
        let store = InMemoryStore::new();
        let patient = stored_patient(&store, "kiah").await;
        let now = Utc::now();

        for days_ago in [30, 5, 90] {
            let entry = DentalHistory::create(
                NewHistoryEntry {
                    patient: patient.id,
                    visit_date: Some(now - Duration::days(days_ago)),
                    notes: format!("{days_ago} days ago"),
                    treatment_provided: String::new(),
                },
                now,
            );
            store.insert_history(&entry).await.unwrap();
        }

        let entries = store.history_for_patient(patient.id).await.unwrap();
        assert_eq!(entries[0].notes, "5 days ago");
        assert_eq!(entries[2].notes, "90 days ago");
    }

    #[tokio::test]
    async fn sessions_expire_and_revoke() {
        let store = InMemoryStore::new();
        let staff = stored_identity(&store, "drsmith", true).await;
        let now = Utc::now();

        let token = store
            .create_session(staff.id, now, Duration::hours(8))
            .await
            .unwrap();

        assert_eq!(
            store.resolve_session(&token, now).await.unwrap(),
            Some(staff.id)
        );
        assert_eq!(
            store
                .resolve_session(&token, now + Duration::hours(9))
                .await
                .unwrap(),
            None
        );

        assert!(store.revoke_session(&token).await.unwrap());
        assert_eq!(store.resolve_session(&token, now).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_parent_is_invalid_reference() {
        let store = InMemoryStore::new();
        let entry = DentalHistory::create(
            NewHistoryEntry {
                patient: PatientId::new(),
                visit_date: None,
                notes: String::new(),
                treatment_provided: String::new(),
            },
            Utc::now(),
        );
        let result = store.insert_history(&entry).await;
        assert!(matches!(result, Err(StoreError::InvalidReference(_))));
    }
}
