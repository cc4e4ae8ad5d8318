//! Appointment requests and their staff-controlled lifecycle.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use dentalis_core::{AppointmentId, DomainError, DomainResult, PatientId};

/// Appointment lifecycle.
///
/// Every appointment starts `Pending`; transitions are applied exclusively by
/// staff through the mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl core::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "invalid appointment status: {other}"
            ))),
        }
    }
}

/// An appointment request owned by one patient profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient: PatientId,
    pub service_requested: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// What a patient supplies when booking.
///
/// Deliberately has no `patient` or `status` field: the owning profile is
/// resolved from the caller and the status always starts `Pending`, so
/// neither can be chosen by the requester.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRequest {
    pub service_requested: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub notes: String,
}

impl AppointmentRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.service_requested.trim().is_empty() {
            return Err(DomainError::validation(
                "service_requested must not be empty",
            ));
        }
        Ok(())
    }
}

impl Appointment {
    /// Book an appointment on behalf of the caller's resolved patient profile.
    pub fn book(
        patient: PatientId,
        request: AppointmentRequest,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        request.validate()?;
        Ok(Self {
            id: AppointmentId::new(),
            patient,
            service_requested: request.service_requested,
            date: request.date,
            time: request.time,
            notes: request.notes,
            status: AppointmentStatus::Pending,
            created_at: now,
        })
    }
}

/// Staff-side partial update (reschedule, note, status transition).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentPatch {
    pub service_requested: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(service) = &self.service_requested {
            if service.trim().is_empty() {
                return Err(DomainError::validation(
                    "service_requested must not be empty",
                ));
            }
        }
        Ok(())
    }

    pub fn apply(self, appointment: &mut Appointment) -> DomainResult<()> {
        self.validate()?;
        if let Some(service) = self.service_requested {
            appointment.service_requested = service;
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
        if let Some(notes) = self.notes {
            appointment.notes = notes;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AppointmentRequest {
        AppointmentRequest {
            service_requested: "Teeth whitening".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            notes: String::new(),
        }
    }

    #[test]
    fn booking_always_starts_pending() {
        let appointment = Appointment::book(PatientId::new(), request(), Utc::now()).unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Pending);
    }

    #[test]
    fn booking_requires_a_service() {
        let mut req = request();
        req.service_requested = String::new();
        assert!(Appointment::book(PatientId::new(), req, Utc::now()).is_err());
    }

    #[test]
    fn staff_patch_transitions_status() {
        let mut appointment = Appointment::book(PatientId::new(), request(), Utc::now()).unwrap();
        AppointmentPatch {
            status: Some(AppointmentStatus::Confirmed),
            ..Default::default()
        }
        .apply(&mut appointment)
        .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    }

    #[test]
    fn status_parses_wire_values() {
        assert_eq!(
            "PENDING".parse::<AppointmentStatus>().unwrap(),
            AppointmentStatus::Pending
        );
        assert!("pending".parse::<AppointmentStatus>().is_err());
    }
}
