//! Pet endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use vet_clinic_core::{NewPet, Pet, PetPatch, PetRegistry};

use super::MessageResponse;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_pets(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<Pet>>> {
    let pets = state
        .with_db(move |db| PetRegistry::new(db).list(&identity.owner_id))
        .await?;
    Ok(Json(pets))
}

pub async fn get_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Pet>> {
    let pet = state
        .with_db(move |db| PetRegistry::new(db).get(&identity.owner_id, &id))
        .await?;
    Ok(Json(pet))
}

pub async fn create_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewPet>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Pet>)> {
    let Json(input) = payload?;
    let pet = state
        .with_db(move |db| PetRegistry::new(db).create(&identity.owner_id, input))
        .await?;
    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn update_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<PetPatch>, JsonRejection>,
) -> ApiResult<Json<Pet>> {
    let Json(patch) = payload?;
    let pet = state
        .with_db(move |db| PetRegistry::new(db).update(&identity.owner_id, &id, patch))
        .await?;
    Ok(Json(pet))
}

pub async fn delete_pet(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .with_db(move |db| PetRegistry::new(db).delete(&identity.owner_id, &id))
        .await?;
    Ok(Json(MessageResponse::new("Pet deleted")))
}
