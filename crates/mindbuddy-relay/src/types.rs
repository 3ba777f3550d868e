use mindbuddy_llm::{ErrorKind, GenerationOptions, HarmBlockThreshold, SafetySetting};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What the user gets when the generation call fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Canned reply from the same branch heuristics, no network
    #[default]
    Fallback,
    /// Apology naming the failure class
    Surface,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WelcomeMode {
    #[default]
    Static,
    /// Ask the model for the opening line, falling back to the static set
    Generated,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub failure_policy: FailurePolicy,
    pub welcome: WelcomeMode,
    pub timeout: Duration,
    pub generation: GenerationOptions,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            welcome: WelcomeMode::default(),
            timeout: Duration::from_secs(30),
            generation: GenerationOptions::new()
                .temperature(0.8)
                .top_k(40)
                .top_p(0.95)
                .max_output_tokens(200)
                .safety_settings(SafetySetting::uniform(HarmBlockThreshold::BlockMediumAndAbove)),
        }
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_welcome(mut self, mode: WelcomeMode) -> Self {
        self.welcome = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_generation(mut self, options: GenerationOptions) -> Self {
        self.generation = options;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplySource {
    Generated,
    Fallback { error: ErrorKind },
    Apology { error: ErrorKind },
}

/// The single outbound reply to one user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotReply {
    pub message: String,
    pub source: ReplySource,
}

impl BotReply {
    pub fn generated(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: ReplySource::Generated,
        }
    }

    pub fn fallback(message: impl Into<String>, error: ErrorKind) -> Self {
        Self {
            message: message.into(),
            source: ReplySource::Fallback { error },
        }
    }

    pub fn apology(message: impl Into<String>, error: ErrorKind) -> Self {
        Self {
            message: message.into(),
            source: ReplySource::Apology { error },
        }
    }
}
