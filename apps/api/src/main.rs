mod config;
mod errors;
mod llm_client;
mod routes;
mod skills;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::skills::{LlmSkillGenerator, MemoryStore, PersistenceAdapter, RedisStore};
use crate::state::{AppState, BoardRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skillboard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM-backed generator
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let generator = Arc::new(LlmSkillGenerator::new(llm));

    // Initialize persistence mirror
    let store: Arc<dyn PersistenceAdapter> = match &config.redis_url {
        Some(url) => {
            let store = RedisStore::open(url)?;
            info!("Redis mirror initialized");
            Arc::new(store)
        }
        None => {
            warn!("REDIS_URL not set, mirroring boards in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let boards = Arc::new(BoardRegistry::new());
    boards
        .clone()
        .spawn_sweeper(config.board_idle_ttl, config.board_idle_ttl / 4);

    let state = AppState {
        config: config.clone(),
        generator,
        store,
        boards,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
