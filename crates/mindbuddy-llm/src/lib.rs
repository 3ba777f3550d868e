pub mod api_key;
pub mod error;
pub mod gemini;
pub mod traits;
pub mod types;

pub use api_key::{ApiKey, ApiKeyError};
pub use error::{ErrorKind, LlmError};
pub use gemini::{GeminiClient, DEFAULT_MODEL};
pub use traits::{GenerationClient, MisconfiguredClient};
pub use types::{
    GenerationOptions, GenerationRequest, GenerationResponse, HarmBlockThreshold, HarmCategory,
    SafetySetting, TokenUsage,
};
