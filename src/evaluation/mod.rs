pub mod gemini;
pub mod generator;
pub mod prompt;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use gemini::GeminiGenerator;
pub use generator::{GenerationError, StructuredGenerator};

// Input for one stop evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub current_latitude: f64,
    pub current_longitude: f64,
    pub last_known_latitude: f64,
    pub last_known_longitude: f64,
    pub stopped_seconds: f64,
    pub guardian_phone: String,
    pub user_phone: String,
}

// Decision returned by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub should_send_check_in: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamEvaluationError {
    #[error("stop evaluation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("stop evaluation returned invalid output: {0}")]
    InvalidOutput(String),
}

/// Decides whether an automated check-in should go out for a stop.
///
/// The judgment belongs entirely to the injected generator: no distance or
/// time threshold is applied here, and failures are returned as-is rather
/// than collapsed into `false`.
#[derive(Clone)]
pub struct StopEvaluator {
    generator: Arc<dyn StructuredGenerator>,
}

impl StopEvaluator {
    pub fn new(generator: Arc<dyn StructuredGenerator>) -> Self {
        Self { generator }
    }

    pub async fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, UpstreamEvaluationError> {
        let prompt = prompt::render(request);
        let schema = prompt::output_schema();

        tracing::debug!(
            stopped_seconds = request.stopped_seconds,
            guardian_phone = %request.guardian_phone,
            "evaluating stop"
        );

        let value = self.generator.generate(&prompt, &schema).await.map_err(|e| {
            tracing::warn!(error = %e, "stop evaluation call failed");
            UpstreamEvaluationError::from(e)
        })?;

        // serde would otherwise accept `[true]` as a struct
        if !value.is_object() {
            tracing::warn!(output = %value, "stop evaluation output is not an object");
            return Err(UpstreamEvaluationError::InvalidOutput(format!(
                "expected a JSON object, got {}",
                value
            )));
        }

        let result: EvaluationResult = serde_json::from_value(value).map_err(|e| {
            tracing::warn!(error = %e, "stop evaluation output failed validation");
            UpstreamEvaluationError::InvalidOutput(e.to_string())
        })?;

        tracing::info!(should_send_check_in = result.should_send_check_in, "stop evaluated");
        Ok(result)
    }
}
