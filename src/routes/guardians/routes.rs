use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use super::{validate_guardian, CreateGuardianRequest};

/// Add a guardian to the user's network
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateGuardianRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let (name, phone) = validate_guardian(&payload).map_err(ApiError::BadRequest)?;

    let guardian = state.guardians.write().await.insert(name, phone);
    tracing::info!(guardian_id = %guardian.id, name = %guardian.name, "guardian added");

    Ok((StatusCode::CREATED, Json(guardian)))
}

/// List guardians in the order they were added
pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    let guardians = state.guardians.read().await.list().to_vec();
    Json(guardians)
}

pub async fn get(
    State(state): State<AppState>,
    Path(guardian_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let book = state.guardians.read().await;
    match book.get(guardian_id) {
        Some(g) => Ok(Json(g.clone())),
        None => Err(ApiError::NotFound("Guardian not found".to_string())),
    }
}

/// Remove a guardian from the network
pub async fn delete(
    State(state): State<AppState>,
    Path(guardian_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state.guardians.write().await.remove(guardian_id);

    match removed {
        Some(g) => {
            tracing::info!(guardian_id = %g.id, name = %g.name, "guardian removed");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound("Guardian not found".to_string())),
    }
}
