//! Postgres-backed store implementation.
//!
//! Referential integrity does the heavy lifting: cascade deletes
//! (patient → history → prescriptions, patient → appointments) and the
//! null-on-identity-delete rule for reviews are enforced by the schema in
//! `migrations/`, so each delete here is a single statement and therefore
//! atomic from the caller's perspective. Partial updates are single
//! `UPDATE ... COALESCE` statements, relying on row-level atomicity; this
//! system performs no multi-row transactions.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use dentalis_auth::{Identity, PasswordHash};
use dentalis_content::{BlogPost, FaqCategory, FaqItem, Review, Slug};
use dentalis_core::{
    AppointmentId, FaqCategoryId, HistoryId, IdentityId, PatientId, PrescriptionId,
};
use dentalis_patients::{
    Appointment, AppointmentPatch, AppointmentStatus, DentalHistory, HistoryPatch, Patient,
    Prescription, PrescriptionPatch,
};

use crate::error::{StoreError, StoreResult, map_sqlx_error};
use crate::traits::{
    AppointmentStore, ContentStore, IdentityStore, PatientStore, ReviewStore, SessionStore,
};

/// Postgres [`crate::ClinicStore`].
///
/// `Send + Sync`; the sqlx pool handles connection management across tasks.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| StoreError::Backend(format!("connect: {e}")))?;
        Ok(Self::new(pool))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    is_staff: bool,
    password: String,
    created_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> Identity {
        Identity {
            id: IdentityId::from_uuid(self.id),
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            is_staff: self.is_staff,
            created_at: self.created_at,
        }
    }

    fn into_identity_with_hash(self) -> StoreResult<(Identity, PasswordHash)> {
        let hash = PasswordHash::from_encoded(&self.password)
            .map_err(|e| StoreError::Backend(format!("identity row: {e}")))?;
        Ok((self.into_identity(), hash))
    }
}

#[derive(Debug, FromRow)]
struct PatientRow {
    id: Uuid,
    identity_id: Uuid,
    phone: String,
    date_of_birth: Option<NaiveDate>,
    added_at: DateTime<Utc>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: PatientId::from_uuid(row.id),
            identity: IdentityId::from_uuid(row.identity_id),
            phone: row.phone,
            date_of_birth: row.date_of_birth,
            added_at: row.added_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: Uuid,
    patient_id: Uuid,
    visit_date: DateTime<Utc>,
    notes: String,
    treatment_provided: String,
}

impl From<HistoryRow> for DentalHistory {
    fn from(row: HistoryRow) -> Self {
        DentalHistory {
            id: HistoryId::from_uuid(row.id),
            patient: PatientId::from_uuid(row.patient_id),
            visit_date: row.visit_date,
            notes: row.notes,
            treatment_provided: row.treatment_provided,
        }
    }
}

#[derive(Debug, FromRow)]
struct PrescriptionRow {
    id: Uuid,
    history_id: Uuid,
    medicine_name: String,
    dosage: String,
    instructions: String,
}

impl From<PrescriptionRow> for Prescription {
    fn from(row: PrescriptionRow) -> Self {
        Prescription {
            id: PrescriptionId::from_uuid(row.id),
            history: HistoryId::from_uuid(row.history_id),
            medicine_name: row.medicine_name,
            dosage: row.dosage,
            instructions: row.instructions,
        }
    }
}

#[derive(Debug, FromRow)]
struct AppointmentRow {
    id: Uuid,
    patient_id: Uuid,
    service_requested: String,
    date: NaiveDate,
    time: NaiveTime,
    notes: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl AppointmentRow {
    fn into_appointment(self) -> StoreResult<Appointment> {
        let status: AppointmentStatus = self
            .status
            .parse()
            .map_err(|e| StoreError::Backend(format!("appointment row: {e}")))?;
        Ok(Appointment {
            id: AppointmentId::from_uuid(self.id),
            patient: PatientId::from_uuid(self.patient_id),
            service_requested: self.service_requested,
            date: self.date,
            time: self.time,
            notes: self.notes,
            status,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: Uuid,
    identity_id: Option<Uuid>,
    patient_name: String,
    review_text: String,
    rating: i16,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: dentalis_core::ReviewId::from_uuid(row.id),
            identity: row.identity_id.map(IdentityId::from_uuid),
            patient_name: row.patient_name,
            review_text: row.review_text,
            rating: row.rating,
        }
    }
}

#[derive(Debug, FromRow)]
struct FaqCategoryRow {
    id: Uuid,
    title: String,
}

#[derive(Debug, FromRow)]
struct FaqItemRow {
    id: Uuid,
    category_id: Uuid,
    question: String,
    answer: String,
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    slug: String,
    title: String,
    body: String,
    published_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> StoreResult<BlogPost> {
        let slug: Slug = self
            .slug
            .parse()
            .map_err(|e| StoreError::Backend(format!("post row: {e}")))?;
        Ok(BlogPost {
            id: dentalis_core::PostId::from_uuid(self.id),
            slug,
            title: self.title,
            body: self.body,
            published_at: self.published_at,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Identities
// ─────────────────────────────────────────────────────────────────────────────

const IDENTITY_COLUMNS: &str =
    "id, username, email, first_name, last_name, is_staff, password, created_at";

#[async_trait]
impl IdentityStore for PgStore {
    #[instrument(skip(self, identity, password), fields(identity_id = %identity.id), err)]
    async fn insert_identity(
        &self,
        identity: &Identity,
        password: &PasswordHash,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO identities
                (id, username, email, first_name, last_name, is_staff, password, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(identity.id.as_uuid())
        .bind(&identity.username)
        .bind(&identity.email)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.is_staff)
        .bind(password.encoded())
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_identity", e))?;
        Ok(())
    }

    async fn identity_by_id(&self, id: IdentityId) -> StoreResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("identity_by_id", e))?;
        Ok(row.map(IdentityRow::into_identity))
    }

    async fn identity_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Option<(Identity, PasswordHash)>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("identity_by_username", e))?;
        row.map(IdentityRow::into_identity_with_hash).transpose()
    }

    #[instrument(skip(self), err)]
    async fn delete_identity(&self, id: IdentityId) -> StoreResult<bool> {
        // FKs cascade the patient profile away and null review references.
        let result = sqlx::query("DELETE FROM identities WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_identity", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patients, history, prescriptions
// ─────────────────────────────────────────────────────────────────────────────

const PATIENT_COLUMNS: &str = "id, identity_id, phone, date_of_birth, added_at";
const HISTORY_COLUMNS: &str = "id, patient_id, visit_date, notes, treatment_provided";
const PRESCRIPTION_COLUMNS: &str = "id, history_id, medicine_name, dosage, instructions";

#[async_trait]
impl PatientStore for PgStore {
    #[instrument(skip(self, patient), fields(patient_id = %patient.id), err)]
    async fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO patients (id, identity_id, phone, date_of_birth, added_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(patient.id.as_uuid())
        .bind(patient.identity.as_uuid())
        .bind(&patient.phone)
        .bind(patient.date_of_birth)
        .bind(patient.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_patient", e))?;
        Ok(())
    }

    async fn patient_by_id(&self, id: PatientId) -> StoreResult<Option<Patient>> {
        let row = sqlx::query_as::<_, PatientRow>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("patient_by_id", e))?;
        Ok(row.map(Patient::from))
    }

    async fn patient_by_identity(&self, identity: IdentityId) -> StoreResult<Option<Patient>> {
        let row = sqlx::query_as::<_, PatientRow>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE identity_id = $1"
        ))
        .bind(identity.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("patient_by_identity", e))?;
        Ok(row.map(Patient::from))
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let rows = sqlx::query_as::<_, PatientRow>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY added_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_patients", e))?;
        Ok(rows.into_iter().map(Patient::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn delete_patient(&self, id: PatientId) -> StoreResult<bool> {
        // Single statement; history, prescriptions and appointments cascade
        // inside the same implicit transaction.
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_patient", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, entry), fields(history_id = %entry.id), err)]
    async fn insert_history(&self, entry: &DentalHistory) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO dental_history (id, patient_id, visit_date, notes, treatment_provided)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.patient.as_uuid())
        .bind(entry.visit_date)
        .bind(&entry.notes)
        .bind(&entry.treatment_provided)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_history", e))?;
        Ok(())
    }

    async fn history_by_id(&self, id: HistoryId) -> StoreResult<Option<DentalHistory>> {
        let row = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM dental_history WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("history_by_id", e))?;
        Ok(row.map(DentalHistory::from))
    }

    async fn list_history(&self) -> StoreResult<Vec<DentalHistory>> {
        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM dental_history ORDER BY visit_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_history", e))?;
        Ok(rows.into_iter().map(DentalHistory::from).collect())
    }

    async fn history_for_patient(&self, patient: PatientId) -> StoreResult<Vec<DentalHistory>> {
        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM dental_history WHERE patient_id = $1 ORDER BY visit_date DESC"
        ))
        .bind(patient.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("history_for_patient", e))?;
        Ok(rows.into_iter().map(DentalHistory::from).collect())
    }

    #[instrument(skip(self, patch), err)]
    async fn update_history(
        &self,
        id: HistoryId,
        patch: HistoryPatch,
    ) -> StoreResult<Option<DentalHistory>> {
        let row = sqlx::query_as::<_, HistoryRow>(&format!(
            r#"
            UPDATE dental_history SET
                visit_date = COALESCE($2, visit_date),
                notes = COALESCE($3, notes),
                treatment_provided = COALESCE($4, treatment_provided)
            WHERE id = $1
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(patch.visit_date)
        .bind(patch.notes)
        .bind(patch.treatment_provided)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_history", e))?;
        Ok(row.map(DentalHistory::from))
    }

    #[instrument(skip(self), err)]
    async fn delete_history(&self, id: HistoryId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM dental_history WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_history", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, prescription), fields(prescription_id = %prescription.id), err)]
    async fn insert_prescription(&self, prescription: &Prescription) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO prescriptions (id, history_id, medicine_name, dosage, instructions)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(prescription.id.as_uuid())
        .bind(prescription.history.as_uuid())
        .bind(&prescription.medicine_name)
        .bind(&prescription.dosage)
        .bind(&prescription.instructions)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_prescription", e))?;
        Ok(())
    }

    async fn prescription_by_id(&self, id: PrescriptionId) -> StoreResult<Option<Prescription>> {
        let row = sqlx::query_as::<_, PrescriptionRow>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("prescription_by_id", e))?;
        Ok(row.map(Prescription::from))
    }

    async fn list_prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        let rows = sqlx::query_as::<_, PrescriptionRow>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_prescriptions", e))?;
        Ok(rows.into_iter().map(Prescription::from).collect())
    }

    async fn prescriptions_for_history(
        &self,
        history: HistoryId,
    ) -> StoreResult<Vec<Prescription>> {
        let rows = sqlx::query_as::<_, PrescriptionRow>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE history_id = $1 ORDER BY id"
        ))
        .bind(history.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("prescriptions_for_history", e))?;
        Ok(rows.into_iter().map(Prescription::from).collect())
    }

    #[instrument(skip(self, patch), err)]
    async fn update_prescription(
        &self,
        id: PrescriptionId,
        patch: PrescriptionPatch,
    ) -> StoreResult<Option<Prescription>> {
        let row = sqlx::query_as::<_, PrescriptionRow>(&format!(
            r#"
            UPDATE prescriptions SET
                medicine_name = COALESCE($2, medicine_name),
                dosage = COALESCE($3, dosage),
                instructions = COALESCE($4, instructions)
            WHERE id = $1
            RETURNING {PRESCRIPTION_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(patch.medicine_name)
        .bind(patch.dosage)
        .bind(patch.instructions)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_prescription", e))?;
        Ok(row.map(Prescription::from))
    }

    #[instrument(skip(self), err)]
    async fn delete_prescription(&self, id: PrescriptionId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM prescriptions WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_prescription", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Appointments
// ─────────────────────────────────────────────────────────────────────────────

const APPOINTMENT_COLUMNS: &str =
    "id, patient_id, service_requested, date, time, notes, status, created_at";

#[async_trait]
impl AppointmentStore for PgStore {
    #[instrument(skip(self, appointment), fields(appointment_id = %appointment.id), err)]
    async fn insert_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, patient_id, service_requested, date, time, notes, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(appointment.id.as_uuid())
        .bind(appointment.patient.as_uuid())
        .bind(&appointment.service_requested)
        .bind(appointment.date)
        .bind(appointment.time)
        .bind(&appointment.notes)
        .bind(appointment.status.as_str())
        .bind(appointment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_appointment", e))?;
        Ok(())
    }

    async fn appointment_by_id(&self, id: AppointmentId) -> StoreResult<Option<Appointment>> {
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("appointment_by_id", e))?;
        row.map(AppointmentRow::into_appointment).transpose()
    }

    async fn list_appointments(&self) -> StoreResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_appointments", e))?;
        rows.into_iter()
            .map(AppointmentRow::into_appointment)
            .collect()
    }

    async fn appointments_for_patient(
        &self,
        patient: PatientId,
    ) -> StoreResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE patient_id = $1 ORDER BY id"
        ))
        .bind(patient.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("appointments_for_patient", e))?;
        rows.into_iter()
            .map(AppointmentRow::into_appointment)
            .collect()
    }

    #[instrument(skip(self, patch), err)]
    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: AppointmentPatch,
    ) -> StoreResult<Option<Appointment>> {
        // One conditional UPDATE so concurrent staff edits cannot interleave
        // a read-modify-write on the same row.
        let row = sqlx::query_as::<_, AppointmentRow>(&format!(
            r#"
            UPDATE appointments SET
                service_requested = COALESCE($2, service_requested),
                date = COALESCE($3, date),
                time = COALESCE($4, time),
                notes = COALESCE($5, notes),
                status = COALESCE($6, status)
            WHERE id = $1
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(patch.service_requested)
        .bind(patch.date)
        .bind(patch.time)
        .bind(patch.notes)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_appointment", e))?;
        row.map(AppointmentRow::into_appointment).transpose()
    }

    #[instrument(skip(self), err)]
    async fn delete_appointment(&self, id: AppointmentId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_appointment", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reviews & site content
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ReviewStore for PgStore {
    #[instrument(skip(self, review), fields(review_id = %review.id), err)]
    async fn insert_review(&self, review: &Review) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, identity_id, patient_name, review_text, rating)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(review.id.as_uuid())
        .bind(review.identity.map(|i| *i.as_uuid()))
        .bind(&review.patient_name)
        .bind(&review.review_text)
        .bind(review.rating)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_review", e))?;
        Ok(())
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        // UUIDv7 ids are time-ordered, so id-descending is newest first.
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, identity_id, patient_name, review_text, rating FROM reviews ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_reviews", e))?;
        Ok(rows.into_iter().map(Review::from).collect())
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_faq_categories(&self) -> StoreResult<Vec<FaqCategory>> {
        let rows =
            sqlx::query_as::<_, FaqCategoryRow>("SELECT id, title FROM faq_categories ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("list_faq_categories", e))?;
        Ok(rows
            .into_iter()
            .map(|row| FaqCategory {
                id: FaqCategoryId::from_uuid(row.id),
                title: row.title,
            })
            .collect())
    }

    async fn faq_items_for_category(&self, category: FaqCategoryId) -> StoreResult<Vec<FaqItem>> {
        let rows = sqlx::query_as::<_, FaqItemRow>(
            "SELECT id, category_id, question, answer FROM faq_items WHERE category_id = $1 ORDER BY id",
        )
        .bind(category.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("faq_items_for_category", e))?;
        Ok(rows
            .into_iter()
            .map(|row| FaqItem {
                id: dentalis_core::FaqItemId::from_uuid(row.id),
                category: FaqCategoryId::from_uuid(row.category_id),
                question: row.question,
                answer: row.answer,
            })
            .collect())
    }

    async fn list_posts(&self) -> StoreResult<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, slug, title, body, published_at FROM blog_posts ORDER BY published_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_posts", e))?;
        rows.into_iter().map(PostRow::into_post).collect()
    }

    async fn post_by_slug(&self, slug: &Slug) -> StoreResult<Option<BlogPost>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, slug, title, body, published_at FROM blog_posts WHERE slug = $1",
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("post_by_slug", e))?;
        row.map(PostRow::into_post).transpose()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Staff sessions
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl SessionStore for PgStore {
    #[instrument(skip(self), fields(identity_id = %identity), err)]
    async fn create_session(
        &self,
        identity: IdentityId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> StoreResult<String> {
        let token = Uuid::now_v7().simple().to_string();
        sqlx::query(
            r#"
            INSERT INTO staff_sessions (token, identity_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token)
        .bind(identity.as_uuid())
        .bind(now)
        .bind(now + ttl)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_session", e))?;
        Ok(token)
    }

    async fn resolve_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<IdentityId>> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT identity_id FROM staff_sessions WHERE token = $1 AND expires_at > $2",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("resolve_session", e))?;
        Ok(row.map(|(id,)| IdentityId::from_uuid(id)))
    }

    #[instrument(skip(self, token), err)]
    async fn revoke_session(&self, token: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM staff_sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("revoke_session", e))?;
        Ok(result.rows_affected() > 0)
    }
}
