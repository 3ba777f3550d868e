use mindbuddy_llm::{ErrorKind, LlmError};
use serde::Serialize;

/// Outcome of one test call against the generation API
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub ok: bool,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
}

impl DiagnosticReport {
    pub fn success(model: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            ok: true,
            model: model.into(),
            error_kind: None,
            message: reply.into(),
            guidance: None,
        }
    }

    pub fn failure(model: impl Into<String>, error: &LlmError) -> Self {
        let kind = error.kind();
        Self {
            ok: false,
            model: model.into(),
            error_kind: Some(kind),
            message: error.to_string(),
            guidance: Some(guidance_for(kind).to_string()),
        }
    }
}

fn guidance_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => {
            "Set GEMINI_API_KEY to a real key (it starts with 'AIza') from https://aistudio.google.com/app/apikey"
        }
        ErrorKind::Authentication => "The API key was rejected. Check that it is valid and has the Generative Language API enabled.",
        ErrorKind::QuotaExceeded => "The API quota is exhausted. Wait for it to reset or check billing and rate limits.",
        ErrorKind::Network => "The API could not be reached. Check network access and the configured base URL.",
        ErrorKind::Timeout => "The API did not answer in time. Try again or raise llm.timeout_secs.",
        ErrorKind::Upstream => "The API returned an error status. See the message for details.",
        ErrorKind::MalformedResponse => "The API answered with something that is not a generateContent response. Check llm.base_url.",
        ErrorKind::EmptyResponse => "The API answered without text, often because of a safety block.",
    }
}
