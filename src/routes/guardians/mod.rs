pub mod routes;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::GuardianBook;

// MODELS

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guardian {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGuardianRequest {
    pub name: String,
    pub phone: String,
}

// HELPER FUNCTIONS

// Names and phones are free text, only emptiness is checked
pub fn validate_guardian(payload: &CreateGuardianRequest) -> Result<(String, String), String> {
    let name = payload.name.trim();
    let phone = payload.phone.trim();

    if name.is_empty() {
        return Err("Guardian name cannot be empty".to_string());
    }
    if phone.is_empty() {
        return Err("Guardian phone cannot be empty".to_string());
    }

    Ok((name.to_string(), phone.to_string()))
}
