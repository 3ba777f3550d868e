use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

const SERVICE_NAME: &str = "MindBuddy Relay";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BannerResponse {
    pub status: String,
    pub service: String,
    pub message: String,
    pub port: u16,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthChecks {
    pub server_running: String,
    /// "configured" or "invalid: <reason>"
    pub gemini_api_key: String,
    pub active_threads: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the API key failed validation
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
    pub timestamp: DateTime<Utc>,
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Server is up", body = BannerResponse)
    ),
    tag = "health"
)]
pub async fn banner(State(state): State<Arc<AppState>>) -> Json<BannerResponse> {
    Json(BannerResponse {
        status: "OK".to_string(),
        service: SERVICE_NAME.to_string(),
        message: "Connection working!".to_string(),
        port: state.config.server.port,
        timestamp: Utc::now(),
    })
}

/// Health check endpoint
///
/// Reports the API key state and how many conversation threads are held in memory
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = if state.key_status.is_configured() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            server_running: "ok".to_string(),
            gemini_api_key: state.key_status.describe(),
            active_threads: state.store.len(),
        },
        timestamp: Utc::now(),
    })
}
