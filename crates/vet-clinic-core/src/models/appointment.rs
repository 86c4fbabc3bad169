//! Appointment models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::patch::{apply, double_option, require_text, required_text};
use super::pet::Pet;
use super::time::{normalize_timestamp, now_rfc3339};
use crate::error::{ClinicError, ClinicResult};

/// Kind of visit, which decides the derived clinical record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentType {
    Treatment,
    Vaccination,
}

impl AppointmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::Treatment => "Treatment",
            AppointmentType::Vaccination => "Vaccination",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentType {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Treatment" => Ok(AppointmentType::Treatment),
            "Vaccination" => Ok(AppointmentType::Vaccination),
            _ => Err(ClinicError::Validation(
                r#"appointmentType must be either "Treatment" or "Vaccination"."#.into(),
            )),
        }
    }
}

/// Appointment status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Booked, not yet seen
    Scheduled,
    /// Visit happened; a clinical record exists
    Completed,
    /// Called off
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(AppointmentStatus::Scheduled),
            "Completed" => Ok(AppointmentStatus::Completed),
            "Cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(ClinicError::Validation(
                r#"status must be one of "Scheduled", "Completed" or "Cancelled"."#.into(),
            )),
        }
    }
}

/// A booked visit for one pet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// Unique appointment ID (UUID)
    pub id: String,
    /// Owning principal
    pub owner_id: String,
    /// Pet being seen; owned by `owner_id`
    pub pet_id: String,
    /// Visit time (RFC 3339, UTC)
    pub date: String,
    /// Reason for the visit
    pub reason: Option<String>,
    /// Visit kind; fixed after creation
    pub appointment_type: AppointmentType,
    /// Lifecycle status
    pub status: AppointmentStatus,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Appointment {
    /// Create a new scheduled appointment.
    pub fn new(
        owner_id: String,
        pet_id: String,
        date: String,
        appointment_type: AppointmentType,
    ) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id,
            pet_id,
            date,
            reason: None,
            appointment_type,
            status: AppointmentStatus::Scheduled,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_rfc3339();
    }
}

/// Request body for booking an appointment.
///
/// Enum fields stay as raw strings so a bad value is a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub pet_id: Option<String>,
    pub date: Option<String>,
    pub reason: Option<String>,
    pub appointment_type: Option<String>,
    pub status: Option<String>,
}

impl NewAppointment {
    /// Validate and build the appointment. The pet reference is checked by the caller.
    pub fn into_appointment(self, owner_id: &str) -> ClinicResult<Appointment> {
        let appointment_type: AppointmentType = self
            .appointment_type
            .as_deref()
            .unwrap_or_default()
            .parse()?;
        let pet_id = require_text("petId", self.pet_id)?;
        let date = normalize_timestamp("date", &require_text("date", self.date)?)?;
        let status = match self.status.as_deref() {
            None => AppointmentStatus::Scheduled,
            Some(raw) => raw.parse()?,
        };
        if status == AppointmentStatus::Completed {
            return Err(ClinicError::Validation(
                "appointments are created Scheduled or Cancelled; complete them with an update"
                    .into(),
            ));
        }

        let mut appointment =
            Appointment::new(owner_id.to_string(), pet_id, date, appointment_type);
        appointment.reason = self.reason;
        appointment.status = status;
        Ok(appointment)
    }
}

/// Partial update for an appointment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub pet_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub reason: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub appointment_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
}

impl AppointmentPatch {
    /// Patch that only sets the status.
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(Some(status.as_str().to_string())),
            ..Default::default()
        }
    }

    /// Validate the patch against `current` and return the merged appointment.
    ///
    /// Pet ownership and the status transition are checked by the caller.
    pub fn resolve(self, current: &Appointment) -> ClinicResult<Appointment> {
        if let Some(raw) = self.appointment_type {
            let requested: AppointmentType = raw.as_deref().unwrap_or_default().parse()?;
            if requested != current.appointment_type {
                return Err(ClinicError::Validation(format!(
                    "appointmentType cannot change after booking (is {})",
                    current.appointment_type
                )));
            }
        }
        let status = match self.status {
            None => None,
            Some(raw) => Some(raw.as_deref().unwrap_or_default().parse::<AppointmentStatus>()?),
        };
        let pet_id = required_text("petId", self.pet_id)?;
        let date = required_text("date", self.date)?
            .map(|raw| normalize_timestamp("date", &raw))
            .transpose()?;

        let mut next = current.clone();
        apply(&mut next.pet_id, pet_id);
        apply(&mut next.date, date);
        apply(&mut next.reason, self.reason);
        apply(&mut next.status, status);
        Ok(next)
    }
}

/// An appointment with its pet resolved for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    /// `None` when the pet was removed after booking
    pub pet: Option<Pet>,
}
