//! Task endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use vet_clinic_core::{NewTask, Task, TaskBoard, TaskPatch};

use super::MessageResponse;
use crate::auth::Identity;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = state
        .with_db(move |db| TaskBoard::new(db).list(&identity.owner_id))
        .await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task = state
        .with_db(move |db| TaskBoard::new(db).get(&identity.owner_id, &id))
        .await?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(input) = payload?;
    let task = state
        .with_db(move |db| TaskBoard::new(db).create(&identity.owner_id, input))
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(patch) = payload?;
    let task = state
        .with_db(move |db| TaskBoard::new(db).update(&identity.owner_id, &id, patch))
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .with_db(move |db| TaskBoard::new(db).delete(&identity.owner_id, &id))
        .await?;
    Ok(Json(MessageResponse::new("Task deleted")))
}
