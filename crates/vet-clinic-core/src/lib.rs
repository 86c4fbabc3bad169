//! Vet-Clinic Core Library
//!
//! Owner-scoped pet registry, task board and appointment lifecycle for a
//! veterinary practice, backed by SQLite.
//!
//! # Architecture
//!
//! ```text
//!   requester id ──► Ownership Guard ──► PetRegistry / TaskBoard / AppointmentManager
//!                                                        │
//!                                   status → Completed   │  (same SQLite transaction)
//!                                                        ▼
//!                                             Clinical Record Factory
//!                                                        │
//!                                      ┌─────────────────┴─────────────────┐
//!                                      ▼                                   ▼
//!                              TreatmentRecord                     VaccinationRecord
//!                         (append-only, one per appointment, SHA-256 digest)
//! ```
//!
//! # Core Principle
//!
//! **Every completed appointment has exactly one clinical record.** The status
//! change and the record commit together; repeating a completion is a no-op.
//!
//! # Modules
//!
//! - [`db`]: SQLite persistence gateway
//! - [`models`]: Domain types (Pet, Appointment, Task, clinical records, patches)
//! - [`guard`]: Ownership guard applied to every read and mutation
//! - [`lifecycle`]: Appointment state machine and lifecycle manager
//! - [`records`]: Clinical record factory
//! - [`pets`], [`tasks`]: Owner-scoped CRUD

pub mod db;
pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod models;
pub mod pets;
pub mod records;
pub mod tasks;

// Re-export commonly used types
pub use db::Database;
pub use error::{ClinicError, ClinicResult, ResourceKind};
pub use lifecycle::AppointmentManager;
pub use models::{
    Appointment, AppointmentPatch, AppointmentStatus, AppointmentType, AppointmentView,
    ClinicalHistory, ClinicalRecord, NewAppointment, NewPet, NewTask, Pet, PetPatch, Task,
    TaskPatch, TreatmentRecord, VaccinationRecord,
};
pub use pets::PetRegistry;
pub use tasks::TaskBoard;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum VetClinicError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Retryable: {0}")]
    Retryable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<ClinicError> for VetClinicError {
    fn from(e: ClinicError) -> Self {
        match e {
            ClinicError::Validation(msg) => VetClinicError::InvalidInput(msg),
            e @ ClinicError::NotFound { .. } => VetClinicError::NotFound(e.to_string()),
            e @ ClinicError::Forbidden { .. } => VetClinicError::Forbidden(e.to_string()),
            e @ (ClinicError::Conflict(_) | ClinicError::Unavailable(_)) => {
                VetClinicError::Retryable(e.to_string())
            }
            e @ ClinicError::Persistence(_) => VetClinicError::DatabaseError(e.to_string()),
        }
    }
}

impl From<db::DbError> for VetClinicError {
    fn from(e: db::DbError) -> Self {
        ClinicError::from(e).into()
    }
}

impl From<serde_json::Error> for VetClinicError {
    fn from(e: serde_json::Error) -> Self {
        VetClinicError::InvalidInput(format!("Malformed patch: {}", e))
    }
}

impl<T> From<std::sync::PoisonError<T>> for VetClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        VetClinicError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<VetClinicCore>, VetClinicError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(VetClinicCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<VetClinicCore>, VetClinicError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(VetClinicCore {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
///
/// Every method takes the authenticated requester's id first. Updates take a
/// JSON patch so absent, `null` and empty fields stay distinguishable.
#[derive(uniffi::Object)]
pub struct VetClinicCore {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl VetClinicCore {
    // =========================================================================
    // Pet Operations
    // =========================================================================

    /// List the requester's pets.
    pub fn list_pets(&self, owner_id: String) -> Result<Vec<FfiPet>, VetClinicError> {
        let db = self.db.lock()?;
        let pets = PetRegistry::new(&db).list(&owner_id)?;
        Ok(pets.into_iter().map(Into::into).collect())
    }

    /// Register a pet.
    pub fn create_pet(
        &self,
        owner_id: String,
        name: String,
        species: String,
        breed: Option<String>,
        age: Option<i64>,
        medical_history: Option<String>,
    ) -> Result<FfiPet, VetClinicError> {
        let db = self.db.lock()?;
        let input = NewPet {
            name: Some(name),
            species: Some(species),
            breed,
            age,
            medical_history,
        };
        Ok(PetRegistry::new(&db).create(&owner_id, input)?.into())
    }

    /// Patch a pet with a JSON object of changed fields.
    pub fn update_pet(
        &self,
        owner_id: String,
        pet_id: String,
        patch_json: String,
    ) -> Result<FfiPet, VetClinicError> {
        let patch: PetPatch = serde_json::from_str(&patch_json)?;
        let db = self.db.lock()?;
        Ok(PetRegistry::new(&db).update(&owner_id, &pet_id, patch)?.into())
    }

    /// Delete a pet.
    pub fn delete_pet(&self, owner_id: String, pet_id: String) -> Result<(), VetClinicError> {
        let db = self.db.lock()?;
        PetRegistry::new(&db).delete(&owner_id, &pet_id)?;
        Ok(())
    }

    /// Clinical records derived for a pet.
    pub fn pet_history(
        &self,
        owner_id: String,
        pet_id: String,
    ) -> Result<Vec<FfiClinicalRecord>, VetClinicError> {
        let db = self.db.lock()?;
        let history = AppointmentManager::new(&db).history(&owner_id, &pet_id)?;
        let treatments = history
            .treatments
            .into_iter()
            .map(ClinicalRecord::Treatment);
        let vaccinations = history
            .vaccinations
            .into_iter()
            .map(ClinicalRecord::Vaccination);
        Ok(treatments.chain(vaccinations).map(Into::into).collect())
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// List the requester's appointments.
    pub fn list_appointments(
        &self,
        owner_id: String,
    ) -> Result<Vec<FfiAppointment>, VetClinicError> {
        let db = self.db.lock()?;
        let views = AppointmentManager::new(&db).list(&owner_id)?;
        Ok(views.into_iter().map(Into::into).collect())
    }

    /// Book an appointment.
    pub fn create_appointment(
        &self,
        owner_id: String,
        pet_id: String,
        date: String,
        appointment_type: String,
        reason: Option<String>,
    ) -> Result<FfiAppointment, VetClinicError> {
        let db = self.db.lock()?;
        let input = NewAppointment {
            pet_id: Some(pet_id),
            date: Some(date),
            reason,
            appointment_type: Some(appointment_type),
            status: None,
        };
        let appointment = AppointmentManager::new(&db).create(&owner_id, input)?;
        Ok(FfiAppointment::without_pet(appointment))
    }

    /// Patch an appointment; completing it derives the clinical record.
    pub fn update_appointment(
        &self,
        owner_id: String,
        appointment_id: String,
        patch_json: String,
    ) -> Result<FfiAppointment, VetClinicError> {
        let patch: AppointmentPatch = serde_json::from_str(&patch_json)?;
        let db = self.db.lock()?;
        let appointment = AppointmentManager::new(&db).update(&owner_id, &appointment_id, patch)?;
        Ok(FfiAppointment::without_pet(appointment))
    }

    /// Delete an appointment.
    pub fn delete_appointment(
        &self,
        owner_id: String,
        appointment_id: String,
    ) -> Result<(), VetClinicError> {
        let db = self.db.lock()?;
        AppointmentManager::new(&db).delete(&owner_id, &appointment_id)?;
        Ok(())
    }

    // =========================================================================
    // Task Operations
    // =========================================================================

    /// List the requester's tasks.
    pub fn list_tasks(&self, owner_id: String) -> Result<Vec<FfiTask>, VetClinicError> {
        let db = self.db.lock()?;
        let tasks = TaskBoard::new(&db).list(&owner_id)?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }

    /// Create a task.
    pub fn create_task(
        &self,
        owner_id: String,
        title: String,
        description: Option<String>,
        due_date: Option<String>,
    ) -> Result<FfiTask, VetClinicError> {
        let db = self.db.lock()?;
        let input = NewTask {
            title: Some(title),
            description,
            status: None,
            due_date,
        };
        Ok(TaskBoard::new(&db).create(&owner_id, input)?.into())
    }

    /// Patch a task with a JSON object of changed fields.
    pub fn update_task(
        &self,
        owner_id: String,
        task_id: String,
        patch_json: String,
    ) -> Result<FfiTask, VetClinicError> {
        let patch: TaskPatch = serde_json::from_str(&patch_json)?;
        let db = self.db.lock()?;
        Ok(TaskBoard::new(&db).update(&owner_id, &task_id, patch)?.into())
    }

    /// Delete a task.
    pub fn delete_task(&self, owner_id: String, task_id: String) -> Result<(), VetClinicError> {
        let db = self.db.lock()?;
        TaskBoard::new(&db).delete(&owner_id, &task_id)?;
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe pet.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPet {
    pub id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub medical_history: Option<String>,
}

impl From<Pet> for FfiPet {
    fn from(pet: Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            age: pet.age,
            medical_history: pet.medical_history,
        }
    }
}

/// FFI-safe appointment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAppointment {
    pub id: String,
    pub pet_id: String,
    pub pet_name: Option<String>,
    pub date: String,
    pub reason: Option<String>,
    pub appointment_type: String,
    pub status: String,
}

impl FfiAppointment {
    fn without_pet(appointment: Appointment) -> Self {
        AppointmentView {
            appointment,
            pet: None,
        }
        .into()
    }
}

impl From<AppointmentView> for FfiAppointment {
    fn from(view: AppointmentView) -> Self {
        let appointment = view.appointment;
        Self {
            id: appointment.id,
            pet_id: appointment.pet_id,
            pet_name: view.pet.map(|p| p.name),
            date: appointment.date,
            reason: appointment.reason,
            appointment_type: appointment.appointment_type.to_string(),
            status: appointment.status.to_string(),
        }
    }
}

/// FFI-safe clinical record (either kind).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClinicalRecord {
    pub id: String,
    pub appointment_id: String,
    pub kind: String,
    /// Treatment details or vaccine name
    pub summary: String,
    pub digest: String,
    pub created_at: String,
}

impl From<ClinicalRecord> for FfiClinicalRecord {
    fn from(record: ClinicalRecord) -> Self {
        match record {
            ClinicalRecord::Treatment(r) => Self {
                id: r.id,
                appointment_id: r.appointment_id,
                kind: AppointmentType::Treatment.to_string(),
                summary: r.treatment_details,
                digest: r.digest,
                created_at: r.created_at,
            },
            ClinicalRecord::Vaccination(r) => Self {
                id: r.id,
                appointment_id: r.appointment_id,
                kind: AppointmentType::Vaccination.to_string(),
                summary: r.vaccine_name,
                digest: r.digest,
                created_at: r.created_at,
            },
        }
    }
}

/// FFI-safe task.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTask {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Option<String>,
}

impl From<Task> for FfiTask {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
        }
    }
}
