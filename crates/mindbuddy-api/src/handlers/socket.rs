use axum::{
    extract::{
        ws::rejection::WebSocketUpgradeRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use mindbuddy_persist::schedule_idle_removal;
use mindbuddy_types::{ClientEvent, ServerEvent};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Sent in place of a reply when a frame can't be understood
pub const UNREADABLE_MESSAGE: &str =
    "Sorry, I couldn't read that message. Could you try sending it again?";

enum Outbound {
    Event(ServerEvent),
    Pong(Vec<u8>),
}

/// Upgrade to the realtime chat channel
///
/// Plain HTTP requests to this route get a JSON 400.
pub async fn ws_handler(
    State(state): State<Arc<AppState>>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> ApiResult<Response> {
    let ws = ws.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)))
}

/// One task per connection. Messages are handled in arrival order, and every
/// `user-message` frame gets exactly one `bot-message` back.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4().to_string();
    tracing::info!(connection_id = %connection_id, "Client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<Outbound>(32);

    let send_task = tokio::spawn(async move {
        while let Some(outbound) = outbound_rx.recv().await {
            let result = match outbound {
                Outbound::Event(event) => match event.to_json() {
                    Ok(json) => ws_tx.send(Message::Text(json)).await,
                    Err(e) => {
                        tracing::error!("Failed to serialize server event: {}", e);
                        continue;
                    }
                },
                Outbound::Pong(data) => ws_tx.send(Message::Pong(data)).await,
            };
            if result.is_err() {
                break;
            }
        }
    });

    let welcome = state.relay.welcome(&connection_id).await;
    send_bot_message(&outbound_tx, welcome).await;

    let mut threads = HashSet::new();

    while let Some(frame) = ws_rx.next().await {
        let reply = match frame {
            Ok(Message::Text(text)) => handle_text(&state, &connection_id, &text, &mut threads).await,
            Ok(Message::Binary(_)) => {
                tracing::warn!(connection_id = %connection_id, "Binary frame ignored");
                UNREADABLE_MESSAGE.to_string()
            }
            Ok(Message::Ping(data)) => {
                let _ = outbound_tx.send(Outbound::Pong(data)).await;
                continue;
            }
            Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::warn!(connection_id = %connection_id, "WebSocket error: {}", e);
                break;
            }
        };

        if !send_bot_message(&outbound_tx, reply).await {
            break;
        }
    }

    drop(outbound_tx);
    let _ = send_task.await;

    if let Some(grace) = state.config.memory.disconnect_grace() {
        for thread_id in threads {
            schedule_idle_removal(state.store.clone(), thread_id, grace);
        }
    }

    tracing::info!(connection_id = %connection_id, "Client disconnected");
}

/// Turn one text frame into the reply text
async fn handle_text(
    state: &AppState,
    connection_id: &str,
    text: &str,
    threads: &mut HashSet<String>,
) -> String {
    let message = match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::UserMessage(message)) => message,
        Err(e) => {
            tracing::warn!(connection_id = %connection_id, error = %e, "Malformed client frame");
            return UNREADABLE_MESSAGE.to_string();
        }
    };

    if message.message.trim().is_empty() {
        return UNREADABLE_MESSAGE.to_string();
    }

    let thread_id = message
        .thread_id()
        .unwrap_or(connection_id)
        .to_string();
    threads.insert(thread_id.clone());

    tracing::debug!(
        connection_id = %connection_id,
        thread_id = %thread_id,
        language = message.language().code(),
        "User message received"
    );

    let reply = state
        .relay
        .handle(Some(&thread_id), &message.message, message.language())
        .await;
    reply.message
}

async fn send_bot_message(tx: &mpsc::Sender<Outbound>, message: String) -> bool {
    tx.send(Outbound::Event(ServerEvent::bot_message(message)))
        .await
        .is_ok()
}
