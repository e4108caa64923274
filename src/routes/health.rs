use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthData {
    status: u16,
    version: &'static str,
    guardians: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthData> {
    let guardians = state.guardians.read().await.len();
    Json(HealthData {
        status: StatusCode::OK.as_u16(),
        version: env!("CARGO_PKG_VERSION"),
        guardians,
    })
}
