use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mindbuddy_api::{
    app::build_router,
    config::Config,
    state::{AppState, KeyStatus},
};
use mindbuddy_llm::{ApiKey, GeminiClient, GenerationClient, MisconfiguredClient};
use mindbuddy_persist::{spawn_sweeper, ThreadMemoryStore};
use mindbuddy_relay::Relay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);
    install_panic_hook();

    tracing::info!("Starting MindBuddy relay");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let (client, key_status) = build_client(&config)?;

    let store = Arc::new(ThreadMemoryStore::new(&config.memory));
    let sweeper = spawn_sweeper(store.clone(), config.memory.sweep_interval());
    tracing::info!(
        ttl_secs = config.memory.ttl_secs,
        sweep_interval_secs = config.memory.sweep_interval_secs,
        "Thread memory sweeper started"
    );

    let relay = Relay::builder()
        .client(client)
        .store(store.clone())
        .config(config.relay_config())
        .seed(config.relay.rng_seed)
        .build()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, relay, key_status));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("WebSocket: ws://{}/ws", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.shutdown().await;
    store.clear();
    tracing::info!("Server stopped");

    Ok(())
}

/// Validate the API key. An invalid key keeps the server up but every relay call
/// fails fast with a configuration error.
fn build_client(config: &Config) -> anyhow::Result<(Arc<dyn GenerationClient>, KeyStatus)> {
    match ApiKey::parse(&config.gemini_api_key) {
        Ok(key) => {
            let masked = key.masked();
            tracing::info!(api_key = %masked, model = %config.llm.model, "Gemini API key configured");

            let client = GeminiClient::with_timeout(key, config.llm.timeout())?
                .with_base_url(&config.llm.base_url)
                .with_model(&config.llm.model);
            let client: Arc<dyn GenerationClient> = Arc::new(client);
            Ok((client, KeyStatus::Configured { masked }))
        }
        Err(reason) => {
            tracing::error!(
                "GEMINI_API_KEY is not usable ({}). Get a key at https://aistudio.google.com/app/apikey; \
                 replies will fail until it is fixed",
                reason
            );
            let client: Arc<dyn GenerationClient> =
                Arc::new(MisconfiguredClient::new(reason.clone(), &config.llm.model));
            Ok((client, KeyStatus::Invalid(reason)))
        }
    }
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("Fatal panic: {}", info);
        std::process::exit(1);
    }));
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
