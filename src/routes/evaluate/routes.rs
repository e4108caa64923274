use axum::{extract::{rejection::JsonRejection, State}, response::IntoResponse, Json};

use crate::error::ApiError;
use crate::evaluation::EvaluationRequest;
use crate::state::AppState;
use super::validate_request;

/// Ask the model whether a stop warrants an automated check-in.
///
/// Only the decision is returned; sending the check-in is up to the caller.
pub async fn evaluate(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    validate_request(&request).map_err(ApiError::BadRequest)?;

    let result = state.evaluator.evaluate(&request).await?;
    Ok(Json(result))
}
