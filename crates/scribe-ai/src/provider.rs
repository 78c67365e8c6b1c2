use async_trait::async_trait;
use serde_json::Value;

use crate::error::AssistError;

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    /// When set, the model must answer with JSON matching this schema.
    pub response_schema: Option<Value>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Value) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: Some(schema),
        }
    }
}

/// One request/response round trip to a generative model.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Returns the raw response text, which may be empty.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AssistError>;
}
