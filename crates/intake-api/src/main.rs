use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intake_api::{build_router, config::Config, state::AppState};
use intake_llm::ClientFactory;
use intake_persist::ThreadStateStore;
use intake_pipeline::IntakeOrchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting project brief intake service");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Store never fails to open; an unreachable MongoDB degrades to memory
    let mut store_builder = ThreadStateStore::builder()
        .database(&config.mongodb.database)
        .collection(&config.mongodb.collection)
        .connect_timeout(Duration::from_millis(config.mongodb.connect_timeout_ms))
        .operation_timeout(Duration::from_millis(config.mongodb.operation_timeout_ms));
    if let Some(uri) = &config.mongodb_uri {
        store_builder = store_builder.mongodb_uri(uri);
    }
    let store = Arc::new(store_builder.build().await);
    tracing::info!(backend = %store.backend_kind(), "Checkpoint store ready");

    let mut orchestrator = IntakeOrchestrator::builder()
        .store(Arc::clone(&store))
        .config(config.pipeline_config());
    match ClientFactory::create_chat_client(config.openai_config())? {
        Some(client) => {
            orchestrator = orchestrator.chat_client(client, config.llm.clone().into());
        }
        None => tracing::warn!("OPENAI_API_KEY not set; using fallback extraction and replies"),
    }
    let orchestrator = orchestrator.build()?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, orchestrator));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped; closing checkpoint store");
    if let Err(e) = store.close().await {
        tracing::warn!("Failed to close checkpoint store: {}", e);
    }

    Ok(())
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
