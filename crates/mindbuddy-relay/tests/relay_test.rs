use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mindbuddy_llm::{
    ApiKeyError, ErrorKind, GenerationClient, GenerationRequest, GenerationResponse, LlmError,
    MisconfiguredClient,
};
use mindbuddy_persist::ThreadMemoryStore;
use mindbuddy_relay::{
    FailurePolicy, Relay, RelayConfig, ReplySource, WelcomeMode, WELCOME_LINES,
};
use mindbuddy_types::Language;

enum Behavior {
    Reply(&'static str),
    Status(u16, &'static str),
    Hang,
}

struct FakeClient {
    behavior: Behavior,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl GenerationClient for FakeClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());

        match &self.behavior {
            Behavior::Reply(text) => Ok(GenerationResponse {
                text: text.to_string(),
                finish_reason: Some("STOP".to_string()),
                usage: None,
                raw: serde_json::Value::Null,
            }),
            Behavior::Status(status, body) => Err(LlmError::Http {
                status: *status,
                body: body.to_string(),
            }),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::MalformedResponse("unreachable".to_string()))
            }
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

fn relay(client: Arc<FakeClient>, config: RelayConfig) -> (Relay, Arc<ThreadMemoryStore>) {
    let store = Arc::new(ThreadMemoryStore::default());
    let relay = Relay::builder()
        .client(client)
        .store(store.clone())
        .config(config)
        .seed(Some(7))
        .build()
        .unwrap();
    (relay, store)
}

#[tokio::test]
async fn test_generated_reply_is_trimmed_and_remembered() {
    let client = FakeClient::new(Behavior::Reply("  Hey! I'm MindBuddy. How's your day?  \n"));
    let (relay, store) = relay(client.clone(), RelayConfig::default());

    let reply = relay.handle(Some("T1"), "hi", Language::English).await;

    assert_eq!(reply.message, "Hey! I'm MindBuddy. How's your day?");
    assert_eq!(reply.source, ReplySource::Generated);
    assert_eq!(client.calls(), 1);
    assert!(client.last_prompt().contains("\"hi\""));

    let memory = store.get("T1").unwrap();
    assert_eq!(memory.last_responses.len(), 1);
    assert!(memory.has_introduced);
}

#[tokio::test]
async fn test_quota_error_surfaces_quota_apology() {
    let client = FakeClient::new(Behavior::Status(429, r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#));
    let config = RelayConfig::default().with_failure_policy(FailurePolicy::Surface);
    let (relay, _) = relay(client.clone(), config);

    let reply = relay.handle(Some("T1"), "i feel stressed", Language::English).await;

    assert_eq!(reply.source, ReplySource::Apology { error: ErrorKind::QuotaExceeded });
    assert!(reply.message.contains("usage limit"));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_quota_error_with_fallback_policy() {
    let client = FakeClient::new(Behavior::Status(429, "quota exceeded"));
    let (relay, store) = relay(client.clone(), RelayConfig::default());

    let reply = relay.handle(Some("T1"), "i feel stressed", Language::English).await;

    assert_eq!(reply.source, ReplySource::Fallback { error: ErrorKind::QuotaExceeded });
    assert!(reply.message.contains("usage limit"));
    assert_eq!(store.get("T1").unwrap().last_responses.len(), 1);
}

#[tokio::test]
async fn test_quota_error_under_default_config_names_the_limit() {
    let client = FakeClient::new(Behavior::Status(429, r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#));
    let (relay, _) = relay(client, RelayConfig::default());

    let reply = relay.handle(Some("T"), "hi", Language::English).await;

    assert!(reply.message.contains("usage limit"), "got: {}", reply.message);
    assert!(reply.message.contains("MindBuddy"));
}

#[tokio::test]
async fn test_non_quota_fallback_has_no_limit_note() {
    let client = FakeClient::new(Behavior::Status(500, "internal"));
    let (relay, _) = relay(client, RelayConfig::default());

    let reply = relay.handle(Some("T"), "hi", Language::English).await;

    assert_eq!(reply.source, ReplySource::Fallback { error: ErrorKind::Upstream });
    assert!(!reply.message.contains("usage limit"));
}

#[tokio::test]
async fn test_crisis_fallback_keeps_resources() {
    let client = FakeClient::new(Behavior::Status(500, "internal"));
    let (relay, _) = relay(client, RelayConfig::default());

    let reply = relay.handle(Some("T1"), "i want to kill myself", Language::English).await;

    assert!(reply.message.contains("988"));
    assert!(reply.message.contains("741741"));
}

#[tokio::test]
async fn test_timeout_is_not_retried() {
    let client = FakeClient::new(Behavior::Hang);
    let config = RelayConfig::default()
        .with_timeout(Duration::from_millis(50))
        .with_failure_policy(FailurePolicy::Surface);
    let (relay, _) = relay(client.clone(), config);

    let reply = relay.handle(Some("T1"), "hello there", Language::English).await;

    assert_eq!(reply.source, ReplySource::Apology { error: ErrorKind::Timeout });
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_blank_generation_is_empty_response() {
    let client = FakeClient::new(Behavior::Reply("   "));
    let config = RelayConfig::default().with_failure_policy(FailurePolicy::Surface);
    let (relay, _) = relay(client, config);

    let reply = relay.handle(Some("T1"), "my day was weird", Language::English).await;

    assert_eq!(reply.source, ReplySource::Apology { error: ErrorKind::EmptyResponse });
}

#[tokio::test]
async fn test_misconfigured_client_fails_with_configuration() {
    let store = Arc::new(ThreadMemoryStore::default());
    let relay = Relay::builder()
        .client(Arc::new(MisconfiguredClient::new(ApiKeyError::Missing, "gemini-test")))
        .store(store)
        .build()
        .unwrap();

    let reply = relay.handle(None, "hello", Language::English).await;

    assert_eq!(reply.source, ReplySource::Fallback { error: ErrorKind::Configuration });
    assert!(relay.store().contains("default"));
}

#[tokio::test]
async fn test_static_welcome() {
    let client = FakeClient::new(Behavior::Reply("unused"));
    let (relay, _) = relay(client.clone(), RelayConfig::default());

    let line = relay.welcome("conn-1").await;

    assert!(WELCOME_LINES.contains(&line.as_str()));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_generated_welcome_falls_back_to_static() {
    let client = FakeClient::new(Behavior::Status(503, "unavailable"));
    let config = RelayConfig::default().with_welcome(WelcomeMode::Generated);
    let (relay, _) = relay(client.clone(), config);

    let line = relay.welcome("conn-1").await;

    assert!(WELCOME_LINES.contains(&line.as_str()));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_diagnose() {
    let ok = FakeClient::new(Behavior::Reply("Hello friend!"));
    let (relay_ok, _) = relay(ok, RelayConfig::default());
    let report = relay_ok.diagnose().await;
    assert!(report.ok);
    assert_eq!(report.model, "fake-model");
    assert_eq!(report.message, "Hello friend!");

    let denied = FakeClient::new(Behavior::Status(403, "PERMISSION_DENIED"));
    let (relay_denied, _) = relay(denied, RelayConfig::default());
    let report = relay_denied.diagnose().await;
    assert!(!report.ok);
    assert_eq!(report.error_kind, Some(ErrorKind::Authentication));
}

#[test]
fn test_builder_requires_client() {
    assert!(Relay::builder().build().is_err());
}
