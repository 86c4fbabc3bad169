//! Derived clinical record operations (insert and read only).

use rusqlite::{params, OptionalExtension, Row};

use super::appointments::{string_to_type, type_to_string};
use super::{Database, DbError, DbResult};
use crate::models::{ClinicalRecord, TreatmentRecord, VaccinationRecord};

const TREATMENT_COLUMNS: &str =
    "id, appointment_id, pet_id, treatment_details, digest, created_at";
const VACCINATION_COLUMNS: &str =
    "id, appointment_id, pet_id, record_type, vaccine_name, date, digest, created_at";

fn treatment_from_row(row: &Row<'_>) -> rusqlite::Result<TreatmentRecord> {
    Ok(TreatmentRecord {
        id: row.get(0)?,
        appointment_id: row.get(1)?,
        pet_id: row.get(2)?,
        treatment_details: row.get(3)?,
        digest: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Intermediate row struct for database mapping.
struct VaccinationRow {
    id: String,
    appointment_id: String,
    pet_id: String,
    record_type: String,
    vaccine_name: String,
    date: String,
    digest: String,
    created_at: String,
}

impl VaccinationRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            appointment_id: row.get(1)?,
            pet_id: row.get(2)?,
            record_type: row.get(3)?,
            vaccine_name: row.get(4)?,
            date: row.get(5)?,
            digest: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl TryFrom<VaccinationRow> for VaccinationRecord {
    type Error = DbError;

    fn try_from(row: VaccinationRow) -> Result<Self, Self::Error> {
        Ok(VaccinationRecord {
            id: row.id,
            appointment_id: row.appointment_id,
            pet_id: row.pet_id,
            record_type: string_to_type(&row.record_type)?,
            vaccine_name: row.vaccine_name,
            date: row.date,
            digest: row.digest,
            created_at: row.created_at,
        })
    }
}

impl Database {
    /// Append a derived record. Fails if the appointment already has one.
    pub fn insert_clinical_record(&self, record: &ClinicalRecord) -> DbResult<()> {
        let result = match record {
            ClinicalRecord::Treatment(r) => self.conn.execute(
                &format!(
                    "INSERT INTO treatment_records ({TREATMENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ),
                params![
                    r.id,
                    r.appointment_id,
                    r.pet_id,
                    r.treatment_details,
                    r.digest,
                    r.created_at,
                ],
            ),
            ClinicalRecord::Vaccination(r) => self.conn.execute(
                &format!(
                    "INSERT INTO vaccination_records ({VACCINATION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                params![
                    r.id,
                    r.appointment_id,
                    r.pet_id,
                    type_to_string(&r.record_type),
                    r.vaccine_name,
                    r.date,
                    r.digest,
                    r.created_at,
                ],
            ),
        };

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(DbError::Constraint(format!(
                    "appointment {} already has a clinical record",
                    record.appointment_id()
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find the record derived from an appointment, if any.
    pub fn get_record_for_appointment(
        &self,
        appointment_id: &str,
    ) -> DbResult<Option<ClinicalRecord>> {
        let treatment = self
            .conn
            .query_row(
                &format!("SELECT {TREATMENT_COLUMNS} FROM treatment_records WHERE appointment_id = ?"),
                [appointment_id],
                treatment_from_row,
            )
            .optional()?;
        if let Some(treatment) = treatment {
            return Ok(Some(ClinicalRecord::Treatment(treatment)));
        }

        self.conn
            .query_row(
                &format!(
                    "SELECT {VACCINATION_COLUMNS} FROM vaccination_records WHERE appointment_id = ?"
                ),
                [appointment_id],
                VaccinationRow::read,
            )
            .optional()?
            .map(|row| VaccinationRecord::try_from(row).map(ClinicalRecord::Vaccination))
            .transpose()
    }

    /// Count derived records for an appointment across both tables.
    pub fn count_records_for_appointment(&self, appointment_id: &str) -> DbResult<u32> {
        let count: u32 = self.conn.query_row(
            r#"
            SELECT (SELECT COUNT(*) FROM treatment_records WHERE appointment_id = ?1)
                 + (SELECT COUNT(*) FROM vaccination_records WHERE appointment_id = ?1)
            "#,
            [appointment_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Treatment records for a pet, oldest first.
    pub fn list_treatments_for_pet(&self, pet_id: &str) -> DbResult<Vec<TreatmentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TREATMENT_COLUMNS} FROM treatment_records WHERE pet_id = ? ORDER BY created_at"
        ))?;
        let rows = stmt.query_map([pet_id], treatment_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Vaccination records for a pet, oldest first.
    pub fn list_vaccinations_for_pet(&self, pet_id: &str) -> DbResult<Vec<VaccinationRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VACCINATION_COLUMNS} FROM vaccination_records WHERE pet_id = ? ORDER BY created_at"
        ))?;
        let rows = stmt.query_map([pet_id], VaccinationRow::read)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }
}
