use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tower::ServiceExt;

use mindbuddy_api::{
    app::build_router,
    config::Config,
    handlers::socket::UNREADABLE_MESSAGE,
    state::{AppState, KeyStatus},
};
use mindbuddy_llm::{
    ApiKeyError, GenerationClient, GenerationRequest, GenerationResponse, LlmError,
    MisconfiguredClient,
};
use mindbuddy_relay::{FailurePolicy, Relay, RelayConfig};

/// Answers every prompt with a fixed line, or fails with a fixed HTTP status
struct ScriptedClient {
    status: Option<u16>,
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        match self.status {
            None => Ok(GenerationResponse {
                text: "I'm here for you. What's on your mind?".to_string(),
                finish_reason: Some("STOP".to_string()),
                usage: None,
                raw: Value::Null,
            }),
            Some(status) => Err(LlmError::Http {
                status,
                body: r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#.to_string(),
            }),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn state_with(client: Arc<dyn GenerationClient>, policy: FailurePolicy, key_status: KeyStatus) -> Arc<AppState> {
    let relay = Relay::builder()
        .client(client)
        .config(RelayConfig::default().with_failure_policy(policy))
        .seed(Some(11))
        .build()
        .unwrap();
    Arc::new(AppState::new(Config::default(), relay, key_status))
}

fn healthy_state() -> Arc<AppState> {
    state_with(
        Arc::new(ScriptedClient { status: None }),
        FailurePolicy::Fallback,
        KeyStatus::Configured {
            masked: "AIzaSyTe...".to_string(),
        },
    )
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_banner() {
    let (status, body) = get_json(build_router(healthy_state()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["port"], 3003);
}

#[tokio::test]
async fn test_health_reports_key_and_threads() {
    let state = healthy_state();
    state.store.touch("t1");

    let (status, body) = get_json(build_router(state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["server_running"], "ok");
    assert_eq!(body["checks"]["gemini_api_key"], "configured");
    assert_eq!(body["checks"]["active_threads"], 1);
}

#[tokio::test]
async fn test_health_with_invalid_key() {
    let state = state_with(
        Arc::new(MisconfiguredClient::new(ApiKeyError::Missing, "gemini-test")),
        FailurePolicy::Fallback,
        KeyStatus::Invalid(ApiKeyError::Missing),
    );

    let (status, body) = get_json(build_router(state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert!(body["checks"]["gemini_api_key"]
        .as_str()
        .unwrap()
        .starts_with("invalid: "));
}

#[tokio::test]
async fn test_gemini_diagnostic_status_codes() {
    let (status, body) = get_json(build_router(healthy_state()), "/api/test-gemini").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let failing = state_with(
        Arc::new(MisconfiguredClient::new(ApiKeyError::Placeholder, "gemini-test")),
        FailurePolicy::Fallback,
        KeyStatus::Invalid(ApiKeyError::Placeholder),
    );
    let (status, body) = get_json(build_router(failing), "/api/test-gemini").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error_kind"], "configuration");
    assert!(body["guidance"].is_string());
}

#[tokio::test]
async fn test_openapi_document() {
    let (status, body) = get_json(build_router(healthy_state()), "/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/health"].is_object());
    assert!(body["paths"]["/api/test-gemini"].is_object());
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (status, body) = get_json(build_router(healthy_state()), "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("/nope"));
}

#[tokio::test]
async fn test_plain_get_on_ws_route_is_json_400() {
    let (status, body) = get_json(build_router(healthy_state()), "/ws").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request: "));
}

async fn spawn_server(state: Arc<AppState>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("ws://{}/ws", addr)
}

async fn next_bot_message<S>(ws: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                let event: Value = serde_json::from_str(&text).unwrap();
                assert_eq!(event["event"], "bot-message");
                return event["data"].clone();
            }
            Some(Ok(_)) => continue,
            other => panic!("connection ended: {:?}", other),
        }
    }
}

/// No further frame may follow a reply
async fn assert_quiet<S>(ws: &mut S)
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let extra = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(extra.is_err(), "unexpected extra frame: {:?}", extra);
}

fn user_message(message: &str, thread_id: &str) -> Message {
    Message::Text(
        json!({
            "event": "user-message",
            "data": { "message": message, "threadId": thread_id }
        })
        .to_string(),
    )
}

#[tokio::test]
async fn test_websocket_round_trip() {
    let state = healthy_state();
    let url = spawn_server(state.clone()).await;
    let (mut ws, _) = connect_async(url).await.unwrap();

    let welcome = next_bot_message(&mut ws).await;
    assert!(welcome["message"].as_str().unwrap().contains("MindBuddy"));
    assert!(welcome["timestamp"].is_string());
    assert_quiet(&mut ws).await;

    ws.send(user_message("hi", "chat-1")).await.unwrap();
    let reply = next_bot_message(&mut ws).await;
    assert_eq!(reply["message"], "I'm here for you. What's on your mind?");
    assert_quiet(&mut ws).await;

    let memory = state.store.get("chat-1").unwrap();
    assert!(memory.has_introduced);
    assert_eq!(memory.greeting_count, 1);
}

#[tokio::test]
async fn test_malformed_frame_gets_apology_and_connection_stays_open() {
    let url = spawn_server(healthy_state()).await;
    let (mut ws, _) = connect_async(url).await.unwrap();
    next_bot_message(&mut ws).await;

    ws.send(Message::Text("not json".to_string())).await.unwrap();
    let apology = next_bot_message(&mut ws).await;
    assert_eq!(apology["message"], UNREADABLE_MESSAGE);
    assert_quiet(&mut ws).await;

    ws.send(user_message("how are you?", "chat-2")).await.unwrap();
    let reply = next_bot_message(&mut ws).await;
    assert!(reply["message"].is_string());
    assert_quiet(&mut ws).await;
}

#[tokio::test]
async fn test_quota_failure_over_websocket() {
    let state = state_with(
        Arc::new(ScriptedClient { status: Some(429) }),
        FailurePolicy::Surface,
        KeyStatus::Configured {
            masked: "AIzaSyTe...".to_string(),
        },
    );
    let url = spawn_server(state).await;
    let (mut ws, _) = connect_async(url).await.unwrap();
    next_bot_message(&mut ws).await;

    ws.send(user_message("i'm so stressed about exams", "chat-3")).await.unwrap();
    let reply = next_bot_message(&mut ws).await;
    assert!(reply["message"].as_str().unwrap().contains("usage limit"));
    assert_quiet(&mut ws).await;

    ws.send(user_message("hello?", "chat-3")).await.unwrap();
    let second = next_bot_message(&mut ws).await;
    assert!(second["message"].is_string());
    assert_quiet(&mut ws).await;
}
