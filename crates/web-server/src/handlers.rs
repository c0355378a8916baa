use crate::{error::AppError, AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
        State,
    },
    http::StatusCode,
    Json,
};
use core_types::{Killer, KillerPayload};
use serde::Serialize;
use std::sync::Arc;

pub const CREATED_MESSAGE: &str = "Killer agregado correctamente";
pub const UPDATED_MESSAGE: &str = "Killer actualizado correctamente";
pub const DELETED_MESSAGE: &str = "Killer eliminado correctamente";

const LIST_FAILED: &str = "Error al obtener los datos";
const GET_FAILED: &str = "Error al obtener el killer";
const CREATE_FAILED: &str = "Error al agregar el killer";
const UPDATE_FAILED: &str = "Error al actualizar el killer";
const DELETE_FAILED: &str = "Error al eliminar el killer";

/// Body of every successful write.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl MessageResponse {
    fn new(message: &'static str) -> Self {
        Self { message, id: None }
    }
}

/// # GET /killers
pub async fn list_killers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Killer>>, AppError> {
    let killers = state
        .repo
        .list_all()
        .await
        .map_err(|e| AppError::from_db(LIST_FAILED, e))?;
    Ok(Json(killers))
}

/// # GET /killers/:id
pub async fn get_killer(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Killer>, AppError> {
    let Path(id) = id?;
    let killer = state
        .repo
        .get_by_id(id)
        .await
        .map_err(|e| AppError::from_db(GET_FAILED, e))?;
    Ok(Json(killer))
}

/// # POST /killers
/// Validates the body, inserts it and answers 201 with the generated id.
pub async fn create_killer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KillerPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(payload) = payload?;
    let fields = payload.validate()?;
    let id = state
        .repo
        .create(&fields)
        .await
        .map_err(|e| AppError::from_db(CREATE_FAILED, e))?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: CREATED_MESSAGE,
            id: Some(id),
        }),
    ))
}

/// # PUT /killers/:id
/// Full replace. The body is validated before storage is touched.
pub async fn update_killer(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<KillerPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let fields = payload.validate()?;
    state
        .repo
        .update(id, &fields)
        .await
        .map_err(|e| AppError::from_db(UPDATE_FAILED, e))?;
    Ok(Json(MessageResponse::new(UPDATED_MESSAGE)))
}

/// # DELETE /killers/:id
pub async fn delete_killer(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Path(id) = id?;
    state
        .repo
        .delete_by_id(id)
        .await
        .map_err(|e| AppError::from_db(DELETE_FAILED, e))?;
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}
