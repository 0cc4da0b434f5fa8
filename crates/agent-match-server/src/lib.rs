//!
//! Agent matching server
//!
//! Wires an embedder and a vector store into a [`MatchingService`] and serves
//! it over HTTP.

use std::sync::Arc;
use std::time::Duration;
use axum::Router;
use tracing::info;

use agent_match_core::{
    create_embedder, verify_embedder, EmbedderConfig, Embedder, InMemoryVectorStore, MatchingService,
    VectorStore,
};

/// API module
pub mod api;

/// Configuration module
pub mod config;

/// Error module
pub mod error;

// Re-export key types
pub use api::{build_router, AppState};
pub use config::{EmbeddingProvider, IndexKind, LogFormat, ServerConfig};
pub use error::{ServerError, ServerResult};

/// Run function
pub async fn run(config: ServerConfig) -> ServerResult<()> {
    // Initialize logging
    init_logging(&config);

    let state = build_state(&config).await?;
    let app = build_app(state, &config);

    let listener = tokio::net::TcpListener::bind((config.bind_address.as_str(), config.port)).await?;
    info!(address = %listener.local_addr()?, "Agent matching server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Router with every layer configured from `config`
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    build_router(state, Duration::from_secs(config.request_timeout_secs))
}

/// Creates the embedder and the store and checks that they agree with the
/// configured dimension before any request is served.
pub async fn build_state(config: &ServerConfig) -> ServerResult<AppState> {
    config.validate()?;

    let embedder = create_embedder_from_config(config)?;
    verify_embedder(embedder.as_ref(), config.vector_dimension).await?;

    let store = create_store(config).await?;
    let service = MatchingService::new(embedder, store)?;

    info!(
        model = %config.effective_model(),
        dimension = config.vector_dimension,
        "Matching service ready"
    );
    Ok(AppState::new(service))
}

fn create_embedder_from_config(config: &ServerConfig) -> ServerResult<Arc<dyn Embedder>> {
    let embedder_config = match config.embedding_provider {
        EmbeddingProvider::Hashing => EmbedderConfig::Hashing {
            dimension: config.vector_dimension,
        },
        EmbeddingProvider::OpenAI => EmbedderConfig::OpenAI {
            api_key: config.openai_api_key.clone().unwrap_or_default(),
            model: config.effective_model(),
            dimension: config.vector_dimension,
        },
    };
    Ok(create_embedder(embedder_config)?)
}

async fn create_store(config: &ServerConfig) -> ServerResult<Arc<dyn VectorStore>> {
    if config.uses_memory_store() {
        info!("Using in-memory vector store");
        return Ok(Arc::new(InMemoryVectorStore::new(config.vector_dimension)));
    }
    create_postgres_store(config).await
}

#[cfg(feature = "postgres")]
async fn create_postgres_store(config: &ServerConfig) -> ServerResult<Arc<dyn VectorStore>> {
    use agent_match_postgres::{PgVectorStore, PostgresConfig, VectorIndex};

    let pg_config = PostgresConfig {
        connection_string: config.database_url.clone(),
        max_connections: config.db_max_connections,
        dimension: config.vector_dimension,
        index: match config.vector_index {
            IndexKind::Exact => VectorIndex::Exact,
            IndexKind::Hnsw => VectorIndex::hnsw(),
        },
        ..Default::default()
    };

    info!(index = ?pg_config.index, "Using PostgreSQL vector store");
    let store = PgVectorStore::connect(&pg_config).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn create_postgres_store(_config: &ServerConfig) -> ServerResult<Arc<dyn VectorStore>> {
    Err(ServerError::ConfigError(
        "PostgreSQL store requested but the 'postgres' feature is not enabled".to_string(),
    ))
}

/// Initialize logging
pub fn init_logging(config: &ServerConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    // Create filter based on config
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // A subscriber may already be installed (tests, embedding applications).
    let _ = match config.log_format {
        LogFormat::Json => fmt().json().with_env_filter(filter).with_target(true).try_init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).try_init(),
    };
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
