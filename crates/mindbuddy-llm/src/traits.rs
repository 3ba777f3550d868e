use async_trait::async_trait;

use crate::api_key::ApiKeyError;
use crate::error::LlmError;
use crate::types::{GenerationRequest, GenerationResponse};

/// A text generation backend: one prompt in, one reply out
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Single non-streaming completion. Implementations must not retry.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;

    /// Model identifier used for requests, reported by diagnostics
    fn model(&self) -> &str;
}

/// Stand-in used when the API key failed validation at startup.
///
/// Every call fails with the original configuration error without touching the network.
#[derive(Debug, Clone)]
pub struct MisconfiguredClient {
    reason: ApiKeyError,
    model: String,
}

impl MisconfiguredClient {
    pub fn new(reason: ApiKeyError, model: impl Into<String>) -> Self {
        Self {
            reason,
            model: model.into(),
        }
    }

    pub fn reason(&self) -> &ApiKeyError {
        &self.reason
    }
}

#[async_trait]
impl GenerationClient for MisconfiguredClient {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        Err(LlmError::Configuration(self.reason.clone()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
