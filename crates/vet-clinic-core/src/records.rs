//! Clinical record factory.
//!
//! Turns a completed appointment into its append-only clinical record.

use crate::error::ClinicResult;
use crate::models::{
    Appointment, AppointmentType, ClinicalRecord, TreatmentRecord, VaccinationRecord,
};

/// Details recorded for a treatment booked without a reason.
pub const NO_TREATMENT_DETAILS: &str = "No details provided";
/// Vaccine name recorded for a vaccination booked without a reason.
pub const NO_VACCINE_NAME: &str = "No vaccine name provided";

/// Build the sealed record for `appointment`, stamped at `now` (RFC 3339).
///
/// An explicitly empty reason is kept as-is; only a missing reason gets the placeholder.
pub fn derive_from_completed(appointment: &Appointment, now: &str) -> ClinicResult<ClinicalRecord> {
    let id = uuid::Uuid::new_v4().to_string();
    let record = match appointment.appointment_type {
        AppointmentType::Treatment => ClinicalRecord::Treatment(TreatmentRecord {
            id,
            appointment_id: appointment.id.clone(),
            pet_id: appointment.pet_id.clone(),
            treatment_details: appointment
                .reason
                .clone()
                .unwrap_or_else(|| NO_TREATMENT_DETAILS.to_string()),
            digest: String::new(),
            created_at: now.to_string(),
        }),
        AppointmentType::Vaccination => ClinicalRecord::Vaccination(VaccinationRecord {
            id,
            appointment_id: appointment.id.clone(),
            pet_id: appointment.pet_id.clone(),
            record_type: appointment.appointment_type,
            vaccine_name: appointment
                .reason
                .clone()
                .unwrap_or_else(|| NO_VACCINE_NAME.to_string()),
            date: now.to_string(),
            digest: String::new(),
            created_at: now.to_string(),
        }),
    };
    Ok(record.seal()?)
}
