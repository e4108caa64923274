use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::ApiError;
use crate::monitor;
use crate::session::Location;
use crate::state::AppState;
use super::{LocationRequest, StartTimerRequest};

/// Current session snapshot
pub async fn get(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await.clone();
    Json(session)
}

/// Start the home-safe countdown
pub async fn start_timer(
    State(state): State<AppState>,
    payload: Result<Json<StartTimerRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let mut session = state.session.write().await;
    let timer = session.start_timer(payload.duration_minutes)?;
    tracing::info!(
        duration_minutes = timer.duration_minutes,
        "home-safe timer started, location shared with guardians"
    );

    Ok((StatusCode::CREATED, Json(session.clone())))
}

/// Stop the countdown because the user got home
pub async fn arrive(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let mut session = state.session.write().await;
    session.arrive_safe()?;
    tracing::info!("user arrived safely, home-safe timer stopped");

    Ok(Json(session.clone()))
}

/// Silent emergency alert
pub async fn alert(State(state): State<AppState>) -> impl IntoResponse {
    let mut session = state.session.write().await;
    session.trigger_silent_alert();
    tracing::warn!("emergency alert activated, sharing location and audio with guardians");

    Json(session.clone())
}

/// Report a location fix from the device
pub async fn location(
    State(state): State<AppState>,
    payload: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    if !payload.lat.is_finite() || !payload.lon.is_finite() {
        return Err(ApiError::BadRequest("lat and lon must be finite numbers".to_string()));
    }

    let fix = Location { lat: payload.lat, lon: payload.lon };
    let outcome = monitor::process_device_fix(&state, fix).await;
    Ok(Json(outcome))
}
