use config::{Config as ConfigLoader, ConfigError, Environment, File};
use mindbuddy_llm::gemini::GEMINI_API_BASE;
use mindbuddy_llm::{GenerationOptions, HarmBlockThreshold, SafetySetting, DEFAULT_MODEL};
use mindbuddy_persist::MemoryConfig;
use mindbuddy_relay::{FailurePolicy, RelayConfig, WelcomeMode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub relay: RelaySettings,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub gemini_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for plain HTTP requests (not WebSocket sessions)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3003,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
    pub safety_threshold: HarmBlockThreshold,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
            temperature: 0.8,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 200,
            timeout_secs: 30,
            safety_threshold: HarmBlockThreshold::BlockMediumAndAbove,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions::new()
            .temperature(self.temperature)
            .top_k(self.top_k)
            .top_p(self.top_p)
            .max_output_tokens(self.max_output_tokens)
            .safety_settings(SafetySetting::uniform(self.safety_threshold))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    pub failure_policy: FailurePolicy,
    pub welcome: WelcomeMode,
    /// Fixed seed for phrasing choices; random when absent
    pub rng_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER__PORT, LLM__MODEL, MEMORY__TTL_SECS, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for section in ["SERVER", "CORS", "LLM", "RELAY", "MEMORY", "LOGGING"] {
            builder = builder.add_source(
                Environment::with_prefix(section)
                    .prefix_separator("__")
                    .separator("__")
                    .keep_prefix(true)
                    .try_parsing(true),
            );
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // A missing key is reported by /health; the server still starts
        cfg.gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

        Ok(cfg)
    }

    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig::new()
            .with_failure_policy(self.relay.failure_policy)
            .with_welcome(self.relay.welcome)
            .with_timeout(self.llm.timeout())
            .with_generation(self.llm.generation_options())
    }
}
