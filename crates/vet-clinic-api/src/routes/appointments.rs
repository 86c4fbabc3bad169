//! Appointment endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use vet_clinic_core::{
    Appointment, AppointmentManager, AppointmentPatch, AppointmentView, ClinicalHistory,
    NewAppointment,
};

use super::MessageResponse;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<AppointmentView>>> {
    let appointments = state
        .with_db(move |db| AppointmentManager::new(db).list(&identity.owner_id))
        .await?;
    Ok(Json(appointments))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Appointment>> {
    let appointment = state
        .with_db(move |db| AppointmentManager::new(db).get(&identity.owner_id, &id))
        .await?;
    Ok(Json(appointment))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let Json(input) = payload?;
    let appointment = state
        .with_db(move |db| AppointmentManager::new(db).create(&identity.owner_id, input))
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Completing an appointment derives its clinical record before responding.
pub async fn update_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentPatch>, JsonRejection>,
) -> ApiResult<Json<Appointment>> {
    let Json(patch) = payload?;
    let appointment = state
        .with_db(move |db| AppointmentManager::new(db).update(&identity.owner_id, &id, patch))
        .await?;
    Ok(Json(appointment))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .with_db(move |db| AppointmentManager::new(db).delete(&identity.owner_id, &id))
        .await?;
    Ok(Json(MessageResponse::new("Appointment deleted")))
}

pub async fn pet_records(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(pet_id): Path<String>,
) -> ApiResult<Json<ClinicalHistory>> {
    let history = state
        .with_db(move |db| AppointmentManager::new(db).history(&identity.owner_id, &pet_id))
        .await?;
    Ok(Json(history))
}
