//! Patient profile, dental history, prescriptions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use dentalis_core::{DomainError, DomainResult, HistoryId, IdentityId, PatientId, PrescriptionId};

// ─────────────────────────────────────────────────────────────────────────────
// Patient
// ─────────────────────────────────────────────────────────────────────────────

/// A patient profile linked 1:1 to a non-staff identity.
///
/// # Invariants
/// - Exactly one profile exists per non-staff identity.
/// - Profiles are created reactively after the identity commit, never by
///   direct user action.
/// - The profile exclusively owns its history entries and appointments
///   (cascade delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub identity: IdentityId,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
}

impl Patient {
    /// Fresh profile for a newly created identity (the profile-linking rule's
    /// output). Contact fields start empty and are filled in by staff later.
    pub fn for_identity(identity: IdentityId, now: DateTime<Utc>) -> Self {
        Self {
            id: PatientId::new(),
            identity,
            phone: String::new(),
            date_of_birth: None,
            added_at: now,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dental history
// ─────────────────────────────────────────────────────────────────────────────

/// One clinic visit. Listed newest `visit_date` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DentalHistory {
    pub id: HistoryId,
    pub patient: PatientId,
    pub visit_date: DateTime<Utc>,
    pub notes: String,
    pub treatment_provided: String,
}

/// Input for a new history entry, created by staff.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHistoryEntry {
    pub patient: PatientId,
    /// Defaults to the request time when omitted.
    pub visit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub treatment_provided: String,
}

impl DentalHistory {
    pub fn create(entry: NewHistoryEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: HistoryId::new(),
            patient: entry.patient,
            visit_date: entry.visit_date.unwrap_or(now),
            notes: entry.notes,
            treatment_provided: entry.treatment_provided,
        }
    }
}

/// Partial update applied by staff. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryPatch {
    pub visit_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub treatment_provided: Option<String>,
}

impl HistoryPatch {
    pub fn apply(self, entry: &mut DentalHistory) {
        if let Some(visit_date) = self.visit_date {
            entry.visit_date = visit_date;
        }
        if let Some(notes) = self.notes {
            entry.notes = notes;
        }
        if let Some(treatment) = self.treatment_provided {
            entry.treatment_provided = treatment;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Prescriptions
// ─────────────────────────────────────────────────────────────────────────────

/// A prescription attached to one history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub history: HistoryId,
    pub medicine_name: String,
    pub dosage: String,
    pub instructions: String,
}

/// Input for a new prescription, created by staff.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPrescription {
    pub history: HistoryId,
    pub medicine_name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub instructions: String,
}

impl NewPrescription {
    pub fn validate(&self) -> DomainResult<()> {
        if self.medicine_name.trim().is_empty() {
            return Err(DomainError::validation("medicine_name must not be empty"));
        }
        Ok(())
    }
}

impl Prescription {
    pub fn create(input: NewPrescription) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id: PrescriptionId::new(),
            history: input.history,
            medicine_name: input.medicine_name,
            dosage: input.dosage,
            instructions: input.instructions,
        })
    }
}

/// Partial update applied by staff.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrescriptionPatch {
    pub medicine_name: Option<String>,
    pub dosage: Option<String>,
    pub instructions: Option<String>,
}

impl PrescriptionPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.medicine_name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("medicine_name must not be empty"));
            }
        }
        Ok(())
    }

    pub fn apply(self, prescription: &mut Prescription) -> DomainResult<()> {
        self.validate()?;
        if let Some(name) = self.medicine_name {
            prescription.medicine_name = name;
        }
        if let Some(dosage) = self.dosage {
            prescription.dosage = dosage;
        }
        if let Some(instructions) = self.instructions {
            prescription.instructions = instructions;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_entry_defaults_visit_date_to_now() {
        let now = Utc::now();
        let entry = DentalHistory::create(
            NewHistoryEntry {
                patient: PatientId::new(),
                visit_date: None,
                notes: "routine cleaning".to_string(),
                treatment_provided: String::new(),
            },
            now,
        );
        assert_eq!(entry.visit_date, now);
    }

    #[test]
    fn prescription_requires_medicine_name() {
        let result = Prescription::create(NewPrescription {
            history: HistoryId::new(),
            medicine_name: "  ".to_string(),
            dosage: "500mg".to_string(),
            instructions: String::new(),
        });
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn history_patch_leaves_absent_fields_untouched() {
        let now = Utc::now();
        let mut entry = DentalHistory::create(
            NewHistoryEntry {
                patient: PatientId::new(),
                visit_date: Some(now),
                notes: "original notes".to_string(),
                treatment_provided: "filling".to_string(),
            },
            now,
        );

        HistoryPatch {
            notes: Some("updated notes".to_string()),
            ..Default::default()
        }
        .apply(&mut entry);

        assert_eq!(entry.notes, "updated notes");
        assert_eq!(entry.treatment_provided, "filling");
        assert_eq!(entry.visit_date, now);
    }

    #[test]
    fn prescription_patch_rejects_blank_medicine_name() {
        let mut prescription = Prescription::create(NewPrescription {
            history: HistoryId::new(),
            medicine_name: "Amoxicillin".to_string(),
            dosage: "500mg".to_string(),
            instructions: "Twice a day after meals".to_string(),
        })
        .unwrap();

        let result = PrescriptionPatch {
            medicine_name: Some(String::new()),
            ..Default::default()
        }
        .apply(&mut prescription);

        assert!(result.is_err());
        assert_eq!(prescription.medicine_name, "Amoxicillin");
    }
}
