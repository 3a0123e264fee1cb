mod calendar;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod resonance;
mod routes;
mod state;
mod store;
mod studio;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EmbeddingBackend};
use crate::db::create_pool;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::resonance::corpus::Corpus;
use crate::resonance::embedding::{Embedder, HashingEmbedder, TeiEmbedder};
use crate::resonance::seed::seed_from_csv;
use crate::resonance::vector_store::InMemoryVectorStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::InMemoryContentStore;
use crate::store::postgres::PgContentStore;
use crate::store::ContentStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resonance API v{}", env!("CARGO_PKG_VERSION"));

    // Content store: PostgreSQL when configured, otherwise process memory
    let store: Arc<dyn ContentStore> = match &config.database_url {
        Some(url) => Arc::new(PgContentStore::new(create_pool(url, config.llm_timeout).await?)),
        None => {
            warn!("DATABASE_URL not set; Brand DNA and scheduled posts will not survive a restart");
            Arc::new(InMemoryContentStore::new())
        }
    };
    info!("Content store: {}", store.backend_name());

    // Embedder + vector store
    let embedder: Arc<dyn Embedder> = match config.embedding_backend {
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.embedding_dim)),
        EmbeddingBackend::Tei => {
            let url = config.tei_url.as_deref().unwrap_or_default();
            Arc::new(TeiEmbedder::new(
                url,
                &config.embedding_model,
                config.embedding_dim,
                config.llm_timeout,
            )?)
        }
    };
    let vectors = Arc::new(InMemoryVectorStore::new(
        embedder.dimension(),
        embedder.model_id(),
    ));
    let corpus = Corpus::new(embedder, vectors)?;
    info!(
        "Corpus ready (embedding model: {}, dimension: {})",
        corpus.embedding_model(),
        config.embedding_dim
    );

    if config.seed_on_startup {
        match seed_from_csv(&corpus, Path::new(&config.seed_csv_path)).await {
            Ok(report) => info!("Startup seed: {} added, {} skipped", report.added, report.skipped),
            Err(e) => warn!("Startup seed failed: {e}"),
        }
    }

    // Initialize LLM client
    let llm = LlmClient::new(
        config.llm_provider,
        config.llm_api_key.clone(),
        config.llm_timeout,
    )?;
    info!(
        "LLM client initialized (provider: {}, model: {})",
        llm.provider_name(),
        config.llm_provider.model()
    );

    // Build app state
    let state = AppState {
        store,
        corpus,
        llm: Arc::new(llm),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
