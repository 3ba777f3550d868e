use std::fmt;
use thiserror::Error;

/// Gemini keys are issued with this prefix
pub const API_KEY_PREFIX: &str = "AIza";
pub const MIN_API_KEY_LEN: usize = 30;

const PLACEHOLDERS: &[&str] = &[
    "your_api_key_here",
    "your-api-key-here",
    "your_gemini_api_key",
    "your-gemini-api-key",
    "your_api_key",
    "api_key_here",
    "changeme",
    "placeholder",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiKeyError {
    #[error("API key is missing")]
    Missing,

    #[error("API key is still a placeholder value")]
    Placeholder,

    #[error("API key is too short ({len} characters, expected at least {min})")]
    TooShort { len: usize, min: usize },

    #[error("API key does not start with the expected prefix 'AIza'")]
    BadPrefix,

    #[error("API key contains whitespace or non-printable characters")]
    InvalidCharacters,
}

/// Validated API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ApiKeyError> {
        let key = raw.as_ref().trim();

        if key.is_empty() {
            return Err(ApiKeyError::Missing);
        }

        let lowered = key.to_ascii_lowercase();
        if PLACEHOLDERS.iter().any(|p| lowered.contains(p))
            || key.chars().all(|c| c == 'x' || c == 'X')
        {
            return Err(ApiKeyError::Placeholder);
        }

        if !key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ApiKeyError::InvalidCharacters);
        }

        if key.len() < MIN_API_KEY_LEN {
            return Err(ApiKeyError::TooShort {
                len: key.len(),
                min: MIN_API_KEY_LEN,
            });
        }

        if !key.starts_with(API_KEY_PREFIX) {
            return Err(ApiKeyError::BadPrefix);
        }

        Ok(Self(key.to_string()))
    }

    /// Read and validate a key from an environment variable
    pub fn from_env(var: &str) -> Result<Self, ApiKeyError> {
        match std::env::var(var) {
            Ok(value) => Self::parse(value),
            Err(_) => Err(ApiKeyError::Missing),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First characters of the key, safe to log
    pub fn masked(&self) -> String {
        format!("{}...", &self.0[..8])
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}
