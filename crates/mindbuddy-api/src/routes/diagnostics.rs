use axum::{extract::State, http::StatusCode, Json};
use mindbuddy_relay::DiagnosticReport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DiagnosticResponse {
    pub ok: bool,
    pub model: String,
    /// Failure class, e.g. "quota_exceeded" or "authentication"
    pub error_kind: Option<String>,
    /// Model reply on success, error detail on failure
    pub message: String,
    pub guidance: Option<String>,
}

impl From<DiagnosticReport> for DiagnosticResponse {
    fn from(report: DiagnosticReport) -> Self {
        Self {
            ok: report.ok,
            model: report.model,
            error_kind: report.error_kind.map(|kind| kind.as_str().to_string()),
            message: report.message,
            guidance: report.guidance,
        }
    }
}

/// Make one test call to the Gemini API
#[utoipa::path(
    get,
    path = "/api/test-gemini",
    responses(
        (status = 200, description = "Gemini answered", body = DiagnosticResponse),
        (status = 503, description = "Gemini call failed", body = DiagnosticResponse)
    ),
    tag = "diagnostics"
)]
pub async fn test_gemini(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<DiagnosticResponse>) {
    let report = state.relay.diagnose().await;
    let status = if report.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report.into()))
}
