use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::evaluation::UpstreamEvaluationError;
use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamEvaluationError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (code, body).into_response()
    }
}

// Malformed or mistyped bodies get the same `{"error": ...}` shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidDuration => ApiError::BadRequest(e.to_string()),
            SessionError::TimerAlreadyActive | SessionError::TimerNotActive => {
                ApiError::Conflict(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::GenerationError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::from(SessionError::TimerNotActive), StatusCode::CONFLICT),
            (ApiError::from(SessionError::InvalidDuration), StatusCode::BAD_REQUEST),
            (
                ApiError::from(UpstreamEvaluationError::from(GenerationError::Timeout)),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.into_response().status(), code);
        }
    }
}
