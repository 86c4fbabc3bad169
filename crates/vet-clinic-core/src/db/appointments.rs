//! Appointment database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::pets::{pet_from_row, PET_COLUMNS};
use super::{Database, DbError, DbResult};
use crate::models::{Appointment, AppointmentStatus, AppointmentType, AppointmentView};

const APPOINTMENT_COLUMNS: &str = "a.id, a.owner_id, a.pet_id, a.date, a.reason, \
     a.appointment_type, a.status, a.created_at, a.updated_at";

impl Database {
    /// Insert a new appointment.
    pub fn insert_appointment(&self, appointment: &Appointment) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO appointments (
                id, owner_id, pet_id, date, reason,
                appointment_type, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                appointment.id,
                appointment.owner_id,
                appointment.pet_id,
                appointment.date,
                appointment.reason,
                type_to_string(&appointment.appointment_type),
                status_to_string(&appointment.status),
                appointment.created_at,
                appointment.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Write `appointment` only if the stored status still equals `expected`.
    ///
    /// Returns `false` when another writer changed the status first.
    pub fn compare_and_set_appointment(
        &self,
        appointment: &Appointment,
        expected: AppointmentStatus,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE appointments SET
                pet_id = ?2,
                date = ?3,
                reason = ?4,
                appointment_type = ?5,
                status = ?6,
                updated_at = ?7
            WHERE id = ?1 AND status = ?8
            "#,
            params![
                appointment.id,
                appointment.pet_id,
                appointment.date,
                appointment.reason,
                type_to_string(&appointment.appointment_type),
                status_to_string(&appointment.status),
                appointment.updated_at,
                status_to_string(&expected),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an appointment by ID.
    pub fn get_appointment(&self, id: &str) -> DbResult<Option<Appointment>> {
        self.conn
            .query_row(
                &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments a WHERE a.id = ?"),
                [id],
                |row| AppointmentRow::read(row, 0),
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List an owner's appointments with each pet joined in, by visit date.
    pub fn list_appointments_with_pets(&self, owner_id: &str) -> DbResult<Vec<AppointmentView>> {
        let pet_columns = PET_COLUMNS
            .split(", ")
            .map(|c| format!("p.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS}, p.id IS NOT NULL, {pet_columns}
            FROM appointments a
            LEFT JOIN pets p ON p.id = a.pet_id
            WHERE a.owner_id = ?
            ORDER BY a.date, a.created_at
            "#
        ))?;

        let rows = stmt.query_map([owner_id], |row| {
            let appointment = AppointmentRow::read(row, 0)?;
            let has_pet: bool = row.get(9)?;
            let pet = if has_pet {
                Some(pet_from_row(row, 10)?)
            } else {
                None
            };
            Ok((appointment, pet))
        })?;

        let mut views = Vec::new();
        for row in rows {
            let (appointment, pet) = row?;
            views.push(AppointmentView {
                appointment: appointment.try_into()?,
                pet,
            });
        }
        Ok(views)
    }

    /// Delete an appointment. Derived records are kept.
    pub fn delete_appointment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct AppointmentRow {
    id: String,
    owner_id: String,
    pet_id: String,
    date: String,
    reason: Option<String>,
    appointment_type: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl AppointmentRow {
    fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            owner_id: row.get(offset + 1)?,
            pet_id: row.get(offset + 2)?,
            date: row.get(offset + 3)?,
            reason: row.get(offset + 4)?,
            appointment_type: row.get(offset + 5)?,
            status: row.get(offset + 6)?,
            created_at: row.get(offset + 7)?,
            updated_at: row.get(offset + 8)?,
        })
    }
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DbError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Appointment {
            id: row.id,
            owner_id: row.owner_id,
            pet_id: row.pet_id,
            date: row.date,
            reason: row.reason,
            appointment_type: string_to_type(&row.appointment_type)?,
            status: string_to_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn type_to_string(appointment_type: &AppointmentType) -> &'static str {
    match appointment_type {
        AppointmentType::Treatment => "treatment",
        AppointmentType::Vaccination => "vaccination",
    }
}

pub(crate) fn string_to_type(s: &str) -> Result<AppointmentType, DbError> {
    match s {
        "treatment" => Ok(AppointmentType::Treatment),
        "vaccination" => Ok(AppointmentType::Vaccination),
        _ => Err(DbError::Constraint(format!("Unknown appointment type: {}", s))),
    }
}

fn status_to_string(status: &AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "scheduled",
        AppointmentStatus::Completed => "completed",
        AppointmentStatus::Cancelled => "cancelled",
    }
}

fn string_to_status(s: &str) -> Result<AppointmentStatus, DbError> {
    match s {
        "scheduled" => Ok(AppointmentStatus::Scheduled),
        "completed" => Ok(AppointmentStatus::Completed),
        "cancelled" => Ok(AppointmentStatus::Cancelled),
        _ => Err(DbError::Constraint(format!("Unknown appointment status: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pet;

    fn setup_db() -> (Database, Pet) {
        let db = Database::open_in_memory().unwrap();
        let pet = Pet::new("owner-1".into(), "Max".into(), "Dog".into());
        db.insert_pet(&pet).unwrap();
        (db, pet)
    }

    fn appointment_for(pet: &Pet) -> Appointment {
        Appointment::new(
            pet.owner_id.clone(),
            pet.id.clone(),
            "2025-08-09T00:00:00.000Z".into(),
            AppointmentType::Vaccination,
        )
    }

    #[test]
    fn test_insert_and_get_appointment() {
        let (db, pet) = setup_db();
        let mut appointment = appointment_for(&pet);
        appointment.reason = Some("Rabies booster".into());
        db.insert_appointment(&appointment).unwrap();

        let retrieved = db.get_appointment(&appointment.id).unwrap().unwrap();
        assert_eq!(retrieved, appointment);
    }

    #[test]
    fn test_compare_and_set_checks_prior_status() {
        let (db, pet) = setup_db();
        let mut appointment = appointment_for(&pet);
        db.insert_appointment(&appointment).unwrap();

        appointment.status = AppointmentStatus::Completed;
        assert!(db
            .compare_and_set_appointment(&appointment, AppointmentStatus::Scheduled)
            .unwrap());
        // Second writer still believes it is Scheduled
        assert!(!db
            .compare_and_set_appointment(&appointment, AppointmentStatus::Scheduled)
            .unwrap());

        let retrieved = db.get_appointment(&appointment.id).unwrap().unwrap();
        assert_eq!(retrieved.status, AppointmentStatus::Completed);
    }

    #[test]
    fn test_list_joins_pet() {
        let (db, pet) = setup_db();
        let appointment = appointment_for(&pet);
        db.insert_appointment(&appointment).unwrap();

        let views = db.list_appointments_with_pets("owner-1").unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].appointment.id, appointment.id);
        assert_eq!(views[0].pet.as_ref().map(|p| p.name.as_str()), Some("Max"));
    }

    #[test]
    fn test_list_survives_deleted_pet() {
        let (db, pet) = setup_db();
        db.insert_appointment(&appointment_for(&pet)).unwrap();
        db.delete_pet(&pet.id).unwrap();

        let views = db.list_appointments_with_pets("owner-1").unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].pet.is_none());
    }

    #[test]
    fn test_list_is_owner_scoped() {
        let (db, pet) = setup_db();
        db.insert_appointment(&appointment_for(&pet)).unwrap();
        assert!(db.list_appointments_with_pets("owner-2").unwrap().is_empty());
    }
}
