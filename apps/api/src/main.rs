mod config;
mod db;
mod documents;
mod embedding;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::embedding::EmbeddingClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::critique::CritiqueModel;
use crate::screening::keywords::LexiconTagger;
use crate::screening::pipeline::{ScreeningOptions, ScreeningPipeline};
use crate::screening::scoring::ScoreOptions;
use crate::state::AppState;
use crate::store::{ApplicationStore, MemoryStore, PgStore};

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

    info!("Starting screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the application store
    let store: Arc<dyn ApplicationStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using the in-memory store (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize model clients
    let embedder = Arc::new(EmbeddingClient::new(
        config.embedding_api_url.clone(),
        config.embedding_api_key.clone(),
        config.embedding_model.clone(),
    )?);
    info!("Embedding client initialized (model: {})", embedder.model());

    let critic: Option<Arc<dyn CritiqueModel>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_model.clone())?;
            info!("LLM client initialized (model: {})", llm.model());
            Some(Arc::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; critiques will be reported as unavailable");
            None
        }
    };

    let pipeline = ScreeningPipeline::new(
        Arc::new(LexiconTagger),
        embedder,
        critic,
        ScreeningOptions {
            scores: ScoreOptions {
                clamp_scores: config.clamp_scores,
                ..ScoreOptions::default()
            },
            project_capture: config.project_capture,
            critique_format: config.critique_format,
            model_timeout: config.model_timeout,
        },
    );
    info!(
        "Screening pipeline ready (timeout: {}s, clamp_scores: {}, project_capture: {:?}, critique_format: {:?})",
        config.model_timeout.as_secs(),
        config.clamp_scores,
        config.project_capture,
        config.critique_format
    );

    // Build app state
    let state = AppState {
        store,
        pipeline,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
