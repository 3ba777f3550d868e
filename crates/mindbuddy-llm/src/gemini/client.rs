// Gemini client implementation (HTTP direct, no SDK)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

use super::responses::GenerateContentResponse;
use crate::api_key::{ApiKey, ApiKeyError};
use crate::error::LlmError;
use crate::traits::GenerationClient;
use crate::types::{GenerationOptions, GenerationRequest, GenerationResponse};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Client whose HTTP requests are aborted after `timeout`
    pub fn with_timeout(api_key: ApiKey, timeout: Duration) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut key_header = HeaderValue::from_str(api_key.expose())
            .map_err(|_| LlmError::Configuration(ApiKeyError::InvalidCharacters))?;
        key_header.set_sensitive(true);
        headers.insert("x-goog-api-key", key_header);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            http_client,
            base_url: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build generateContent request payload
    pub fn build_payload(prompt: &str, options: &GenerationOptions) -> Value {
        let mut request = serde_json::json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ],
        });

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = options.temperature {
            generation_config.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(top_k) = options.top_k {
            generation_config.insert("topK".to_string(), serde_json::json!(top_k));
        }
        if let Some(top_p) = options.top_p {
            generation_config.insert("topP".to_string(), serde_json::json!(top_p));
        }
        if let Some(max_tokens) = options.max_output_tokens {
            generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
        }

        if let Some(obj) = request.as_object_mut() {
            if !generation_config.is_empty() {
                obj.insert("generationConfig".to_string(), Value::Object(generation_config));
            }
            if !options.safety_settings.is_empty() {
                obj.insert(
                    "safetySettings".to_string(),
                    serde_json::json!(options.safety_settings),
                );
            }
        }

        request
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let payload = Self::build_payload(&request.prompt, &request.options);

        tracing::debug!(
            model = %self.model,
            prompt_chars = request.prompt.len(),
            "Sending generateContent request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.timeout))?;

        if !status.is_success() {
            tracing::warn!(status = %status, body = %body, "Gemini API returned an error status");
            return Err(LlmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = serde_json::from_str(&body)
            .map_err(|e| LlmError::MalformedResponse(format!("invalid JSON: {}", e)))?;
        let parsed: GenerateContentResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::MalformedResponse(format!("unexpected shape: {}", e)))?;

        let text = parsed.text().ok_or_else(|| LlmError::EmptyResponse {
            finish_reason: parsed.finish_reason(),
        })?;

        Ok(GenerationResponse {
            text,
            finish_reason: parsed.finish_reason(),
            usage: parsed.usage(),
            raw,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HarmBlockThreshold, SafetySetting};

    #[test]
    fn test_payload_includes_generation_config() {
        let options = GenerationOptions::new()
            .temperature(0.9)
            .top_k(40)
            .top_p(0.95)
            .max_output_tokens(200)
            .safety_settings(SafetySetting::uniform(HarmBlockThreshold::BlockMediumAndAbove));

        let payload = GeminiClient::build_payload("hello there", &options);

        assert_eq!(payload["contents"][0]["parts"][0]["text"], "hello there");
        assert_eq!(payload["generationConfig"]["topK"], 40);
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 200);
        assert_eq!(payload["safetySettings"].as_array().unwrap().len(), 4);
        assert_eq!(
            payload["safetySettings"][0]["threshold"],
            "BLOCK_MEDIUM_AND_ABOVE"
        );
        assert_eq!(payload["safetySettings"][0]["category"], "HARM_CATEGORY_HARASSMENT");
    }

    #[test]
    fn test_payload_without_options() {
        let payload = GeminiClient::build_payload("hi", &GenerationOptions::default());

        assert!(payload.get("generationConfig").is_none());
        assert!(payload.get("safetySettings").is_none());
    }
}
