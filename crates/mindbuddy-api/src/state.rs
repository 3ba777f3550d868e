use std::sync::Arc;

use mindbuddy_llm::ApiKeyError;
use mindbuddy_persist::ThreadMemoryStore;
use mindbuddy_relay::Relay;

use crate::config::Config;

/// Outcome of validating `GEMINI_API_KEY` at startup
#[derive(Debug, Clone)]
pub enum KeyStatus {
    Configured { masked: String },
    Invalid(ApiKeyError),
}

impl KeyStatus {
    pub fn is_configured(&self) -> bool {
        matches!(self, KeyStatus::Configured { .. })
    }

    /// Value reported under `checks.gemini_api_key` in /health
    pub fn describe(&self) -> String {
        match self {
            KeyStatus::Configured { .. } => "configured".to_string(),
            KeyStatus::Invalid(reason) => format!("invalid: {}", reason),
        }
    }
}

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: Arc<Relay>,
    pub store: Arc<ThreadMemoryStore>,
    pub key_status: KeyStatus,
}

impl AppState {
    pub fn new(config: Config, relay: Relay, key_status: KeyStatus) -> Self {
        let store = relay.store().clone();
        Self {
            config: Arc::new(config),
            relay: Arc::new(relay),
            store,
            key_status,
        }
    }
}
