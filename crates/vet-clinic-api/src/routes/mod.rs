//! API route handlers

pub mod appointments;
pub mod health;
pub mod pets;
pub mod tasks;

use axum::{middleware, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::auth::require_auth;
use crate::state::AppState;

/// Body returned by deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        // Pet endpoints
        .route("/pets", get(pets::list_pets).post(pets::create_pet))
        .route(
            "/pets/:id",
            get(pets::get_pet)
                .put(pets::update_pet)
                .delete(pets::delete_pet),
        )
        .route("/pets/:id/records", get(appointments::pet_records))
        // Appointment endpoints
        .route(
            "/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        // Task endpoints
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            require_auth,
        ));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .merge(protected);

    Router::new().nest("/api", api).with_state(state)
}
