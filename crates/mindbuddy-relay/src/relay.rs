use std::sync::Arc;
use std::time::Instant;

use mindbuddy_llm::{ErrorKind, GenerationClient, GenerationRequest, LlmError};
use mindbuddy_persist::ThreadMemoryStore;
use mindbuddy_prompt::{PromptBranch, PromptEngine};
use mindbuddy_types::{Language, DEFAULT_THREAD_ID};
use rand::seq::SliceRandom;

use crate::apology::apology_for;
use crate::builder::RelayBuilder;
use crate::diagnostics::DiagnosticReport;
use crate::fallback::{fallback_reply, with_rate_limit_note};
use crate::types::{BotReply, FailurePolicy, RelayConfig, WelcomeMode};
use crate::welcome::{WELCOME_LINES, WELCOME_PROMPT};

const DIAGNOSTIC_PROMPT: &str = "Say hello in one short, friendly sentence.";

/// One user message in, exactly one reply out.
///
/// Each call issues at most one generation request, bounded by the configured
/// timeout. Failures are never retried; they become a fallback reply or an
/// apology depending on [`FailurePolicy`].
pub struct Relay {
    client: Arc<dyn GenerationClient>,
    engine: PromptEngine,
    config: RelayConfig,
}

impl Relay {
    pub(crate) fn new(client: Arc<dyn GenerationClient>, engine: PromptEngine, config: RelayConfig) -> Self {
        Self {
            client,
            engine,
            config,
        }
    }

    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    pub fn store(&self) -> &Arc<ThreadMemoryStore> {
        self.engine.store()
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub async fn handle(&self, thread_id: Option<&str>, text: &str, language: Language) -> BotReply {
        let thread = thread_id.unwrap_or(DEFAULT_THREAD_ID);
        let started = Instant::now();
        let selection = self.engine.prepare(Some(thread), text, language);

        match self.generate(&selection.instruction).await {
            Ok(reply) => {
                tracing::info!(
                    thread_id = %thread,
                    branch = selection.branch.name(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Generated reply"
                );
                self.engine.record_reply(Some(thread), &reply);
                BotReply::generated(reply)
            }
            Err(error) => self.recover(thread, &selection.branch, language, error),
        }
    }

    fn recover(&self, thread: &str, branch: &PromptBranch, language: Language, error: LlmError) -> BotReply {
        let kind = error.kind();
        match &error {
            LlmError::Http { status, body } => tracing::error!(
                thread_id = %thread,
                status,
                body = %body,
                kind = %kind,
                "Generation API returned an error"
            ),
            other => tracing::error!(
                thread_id = %thread,
                kind = %kind,
                error = %other,
                "Generation call failed"
            ),
        }

        match self.config.failure_policy {
            FailurePolicy::Fallback => {
                let mut message = self
                    .engine
                    .with_rng_mut(|rng| fallback_reply(branch, language, rng));
                if kind == ErrorKind::QuotaExceeded {
                    message = with_rate_limit_note(message, language);
                }
                self.engine.record_reply(Some(thread), &message);
                BotReply::fallback(message, kind)
            }
            FailurePolicy::Surface => BotReply::apology(apology_for(&error), kind),
        }
    }

    /// Opening line for a new connection
    pub async fn welcome(&self, thread_id: &str) -> String {
        if self.config.welcome == WelcomeMode::Generated {
            match self.generate(WELCOME_PROMPT).await {
                Ok(line) => return line,
                Err(e) => tracing::warn!(
                    thread_id = %thread_id,
                    kind = %e.kind(),
                    "Generated welcome failed, using a static one"
                ),
            }
        }

        self.engine.with_rng_mut(|rng| {
            WELCOME_LINES
                .choose(rng)
                .copied()
                .unwrap_or("Hi! I'm MindBuddy. How are you doing today?")
                .to_string()
        })
    }

    /// One test call against the generation API
    pub async fn diagnose(&self) -> DiagnosticReport {
        match self.generate(DIAGNOSTIC_PROMPT).await {
            Ok(reply) => DiagnosticReport::success(self.model(), reply),
            Err(e) => {
                tracing::warn!(kind = %e.kind(), error = %e, "Generation API diagnostic failed");
                DiagnosticReport::failure(self.model(), &e)
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerationRequest::new(prompt).with_options(self.config.generation.clone());
        let limit = self.config.timeout;

        let response = tokio::time::timeout(limit, self.client.generate(request))
            .await
            .map_err(|_| LlmError::Timeout(limit))??;

        let text = response.text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                finish_reason: response.finish_reason,
            });
        }
        Ok(text.to_string())
    }
}
