use axum::{
    http::{Method, Uri},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    error::ApiError,
    handlers::socket,
    middleware::logging,
    routes::{diagnostics, health},
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(health::banner, health::health_check, diagnostics::test_gemini),
    components(schemas(
        health::BannerResponse,
        health::HealthChecks,
        health::HealthResponse,
        diagnostics::DiagnosticResponse
    )),
    tags(
        (name = "health", description = "Liveness and configuration checks"),
        (name = "diagnostics", description = "Gemini connectivity test")
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    // The timeout layer must not cut long-lived WebSocket sessions short
    let http_routes = Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        .route("/api/test-gemini", get(diagnostics::test_gemini))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new());

    Router::new()
        .route("/ws", get(socket::ws_handler))
        .merge(http_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(middleware::from_fn(logging::log_request))
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}

pub fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            let origins: Vec<_> = config
                .cors
                .origins
                .iter()
                .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
                .collect();
            cors = cors.allow_origin(origins);
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}
