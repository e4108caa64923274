use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream response was not usable: {0}")]
    Malformed(String),
}

/// A text-generation backend constrained to answer with a value matching
/// the given JSON schema.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, GenerationError>;
}
