use std::sync::Arc;

use anyhow::{anyhow, Result};
use mindbuddy_llm::GenerationClient;
use mindbuddy_persist::ThreadMemoryStore;
use mindbuddy_prompt::PromptEngine;

use crate::relay::Relay;
use crate::types::RelayConfig;

/// Builder for a [`Relay`]; only the generation client is required
pub struct RelayBuilder {
    client: Option<Arc<dyn GenerationClient>>,
    store: Option<Arc<ThreadMemoryStore>>,
    config: RelayConfig,
    seed: Option<u64>,
}

impl RelayBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            store: None,
            config: RelayConfig::default(),
            seed: None,
        }
    }

    pub fn client(mut self, client: Arc<dyn GenerationClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Share an existing thread memory store (otherwise a default one is created)
    pub fn store(mut self, store: Arc<ThreadMemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: RelayConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the phrasing RNG for reproducible replies
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<Relay> {
        let client = self
            .client
            .ok_or_else(|| anyhow!("Generation client is required"))?;
        let store = self.store.unwrap_or_default();

        let engine = match self.seed {
            Some(seed) => PromptEngine::with_seed(store, seed),
            None => PromptEngine::new(store),
        };

        Ok(Relay::new(client, engine, self.config))
    }
}

impl Default for RelayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
