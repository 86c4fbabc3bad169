//! Vet-Clinic HTTP API
//!
//! JSON over HTTP for the owner-scoped pet registry, task board and appointment
//! lifecycle in `vet-clinic-core`. Every route except `/api/health` requires a
//! bearer token; the token subject is the owner id the core checks against.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::{AuthState, Identity, JwtConfig};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use server::{create_server, run_server};
pub use state::AppState;
