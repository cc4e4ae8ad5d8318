//! `dentalis-patients` — patient-side clinical records.
//!
//! Plain domain records: the patient profile, its dental-history entries
//! (one per visit) with nested prescriptions, and appointment requests.
//! Persistence and access control live elsewhere.

pub mod appointment;
pub mod patient;

pub use appointment::{
    Appointment, AppointmentPatch, AppointmentRequest, AppointmentStatus,
};
pub use patient::{
    DentalHistory, HistoryPatch, NewHistoryEntry, NewPrescription, Patient, Prescription,
    PrescriptionPatch,
};
