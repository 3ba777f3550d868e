use axum::{
    extract::Request,
    http::header::UPGRADE,
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Logs one line per HTTP request; 5xx responses are logged as warnings.
///
/// WebSocket upgrades are logged when the handshake completes, not when the session ends.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let upgrade = req.headers().contains_key(UPGRADE);
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::warn!(method = %method, uri = %uri, status = %status, duration_ms, "Request failed");
    } else if upgrade {
        tracing::debug!(uri = %uri, status = %status, duration_ms, "WebSocket handshake");
    } else {
        tracing::info!(method = %method, uri = %uri, status = %status, duration_ms, "Request processed");
    }

    response
}
