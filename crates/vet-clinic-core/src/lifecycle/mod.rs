//! Appointment lifecycle manager.
//!
//! Booking, patching and cancelling appointments, and deriving the clinical
//! record when an appointment is completed. A completing update and its record
//! commit in one SQLite transaction or not at all.

pub mod transition;

pub use transition::{on_transition, TransitionEffect};

use tracing::info;

use crate::db::Database;
use crate::error::{ClinicError, ClinicResult, ResourceKind};
use crate::guard::require_owned;
use crate::models::{
    now_rfc3339, Appointment, AppointmentPatch, AppointmentView, ClinicalHistory, NewAppointment,
    Pet,
};
use crate::records::derive_from_completed;

/// Owner-scoped appointment operations.
pub struct AppointmentManager<'a> {
    db: &'a Database,
}

impl<'a> AppointmentManager<'a> {
    /// Create a new manager.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// The requester's appointments, each with its pet resolved.
    pub fn list(&self, owner_id: &str) -> ClinicResult<Vec<AppointmentView>> {
        Ok(self.db.list_appointments_with_pets(owner_id)?)
    }

    /// One appointment, if the requester owns it.
    pub fn get(&self, owner_id: &str, appointment_id: &str) -> ClinicResult<Appointment> {
        self.load(owner_id, appointment_id)
    }

    /// Book an appointment for one of the requester's pets.
    pub fn create(&self, owner_id: &str, input: NewAppointment) -> ClinicResult<Appointment> {
        let appointment = input.into_appointment(owner_id)?;
        self.require_pet(owner_id, &appointment.pet_id)?;

        self.db.insert_appointment(&appointment)?;
        info!(
            appointment_id = %appointment.id,
            pet_id = %appointment.pet_id,
            appointment_type = %appointment.appointment_type,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Apply a partial patch, deriving the clinical record on completion.
    pub fn update(
        &self,
        owner_id: &str,
        appointment_id: &str,
        patch: AppointmentPatch,
    ) -> ClinicResult<Appointment> {
        let tx = self.db.immediate_transaction()?;

        let current = self.load(owner_id, appointment_id)?;
        let mut next = patch.resolve(&current)?;
        if next.pet_id != current.pet_id {
            self.require_pet(owner_id, &next.pet_id)?;
        }
        transition::check(current.status, next.status)?;
        let effects = on_transition(current.status, next.status, next.appointment_type);

        next.touch();
        if !self.db.compare_and_set_appointment(&next, current.status)? {
            return Err(ClinicError::Conflict(format!(
                "appointment {appointment_id} changed status during the update"
            )));
        }

        for effect in effects {
            match effect {
                TransitionEffect::DeriveRecord(_) => {
                    let record = derive_from_completed(&next, &now_rfc3339())?;
                    self.db.insert_clinical_record(&record)?;
                    info!(
                        appointment_id = %next.id,
                        record_id = %record.id(),
                        "appointment completed, clinical record derived"
                    );
                }
            }
        }

        tx.commit()?;
        Ok(next)
    }

    /// Remove an appointment. Derived records stay.
    pub fn delete(&self, owner_id: &str, appointment_id: &str) -> ClinicResult<()> {
        self.load(owner_id, appointment_id)?;
        if !self.db.delete_appointment(appointment_id)? {
            return Err(ClinicError::not_found(ResourceKind::Appointment, appointment_id));
        }
        info!(appointment_id, "appointment deleted");
        Ok(())
    }

    /// Clinical records derived for one of the requester's pets.
    pub fn history(&self, owner_id: &str, pet_id: &str) -> ClinicResult<ClinicalHistory> {
        self.require_pet(owner_id, pet_id)?;
        Ok(ClinicalHistory {
            pet_id: pet_id.to_string(),
            treatments: self.db.list_treatments_for_pet(pet_id)?,
            vaccinations: self.db.list_vaccinations_for_pet(pet_id)?,
        })
    }

    fn load(&self, owner_id: &str, appointment_id: &str) -> ClinicResult<Appointment> {
        require_owned(
            ResourceKind::Appointment,
            appointment_id,
            self.db.get_appointment(appointment_id)?,
            owner_id,
        )
    }

    fn require_pet(&self, owner_id: &str, pet_id: &str) -> ClinicResult<Pet> {
        require_owned(ResourceKind::Pet, pet_id, self.db.get_pet(pet_id)?, owner_id)
    }
}
