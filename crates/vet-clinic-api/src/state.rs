//! Application state for the API server

use std::sync::{Arc, Mutex};

use vet_clinic_core::{ClinicResult, Database};

use crate::auth::{AuthState, JwtConfig};
use crate::error::{ApiError, ApiResult};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Single SQLite connection; requests take turns on it
    pub db: Arc<Mutex<Database>>,
    /// Bearer-token validation
    pub auth: AuthState,
    /// Deployment environment name
    pub environment: String,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtConfig, environment: impl Into<String>) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            auth: AuthState::new(jwt),
            environment: environment.into(),
        }
    }

    /// Run a core operation on a blocking worker.
    pub async fn with_db<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&Database) -> ClinicResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let db = db
                .lock()
                .map_err(|e| ApiError::InternalError(format!("Lock poisoned: {}", e)))?;
            op(&db).map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("Worker failed: {}", e)))?
    }
}
