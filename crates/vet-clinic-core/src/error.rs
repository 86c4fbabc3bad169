//! Domain error taxonomy.

use std::fmt;

use thiserror::Error;

use crate::db::DbError;

/// Kind of owner-scoped resource, for error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Pet,
    Appointment,
    Task,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Pet => "Pet",
            ResourceKind::Appointment => "Appointment",
            ResourceKind::Task => "Task",
        })
    }
}

/// Errors surfaced by the registry, task board and lifecycle manager.
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("{0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    #[error("Not authorized to access {kind} {id}")]
    Forbidden { kind: ResourceKind, id: String },

    #[error("Concurrent update: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Persistence error: {0}")]
    Persistence(DbError),
}

impl ClinicError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        ClinicError::NotFound { kind, id: id.into() }
    }

    pub fn forbidden(kind: ResourceKind, id: impl Into<String>) -> Self {
        ClinicError::Forbidden { kind, id: id.into() }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClinicError::Conflict(_) | ClinicError::Unavailable(_))
    }
}

impl From<DbError> for ClinicError {
    fn from(e: DbError) -> Self {
        if e.is_busy() {
            ClinicError::Unavailable(e.to_string())
        } else {
            ClinicError::Persistence(e)
        }
    }
}

impl From<rusqlite::Error> for ClinicError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::from(e).into()
    }
}

impl From<serde_json::Error> for ClinicError {
    fn from(e: serde_json::Error) -> Self {
        ClinicError::Persistence(DbError::Json(e))
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
