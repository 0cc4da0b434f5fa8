//! Configuration for the agent matching server
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file by the binary. Malformed values are rejected instead of silently
//! replaced by defaults, since a wrong vector dimension or store URL would
//! only surface later as failed requests.

use serde::{Deserialize, Serialize};
use std::env;
use tracing::{info, warn};

use agent_match_core::DEFAULT_VECTOR_DIMENSION;

use crate::error::{ServerError, ServerResult};

/// Model id of the local hashing embedder
pub const HASHING_MODEL: &str = "feature-hash-v1";

/// Model used by the OpenAI provider when `MODEL_NAME` is not set
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProvider {
    Hashing,
    OpenAI,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Exact,
    Hnsw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub bind_address: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// `memory://` for the in-process store, `postgres://...` for PostgreSQL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_provider")]
    pub embedding_provider: EmbeddingProvider,

    /// Embedding model; defaults per provider
    #[serde(default)]
    pub model_name: Option<String>,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Length of every stored and queried vector
    #[serde(default = "default_dimension")]
    pub vector_dimension: usize,

    #[serde(default = "default_index")]
    pub vector_index: IndexKind,

    /// Maximum number of pooled database connections
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "memory://".to_string()
}

fn default_provider() -> EmbeddingProvider {
    EmbeddingProvider::Hashing
}

fn default_dimension() -> usize {
    DEFAULT_VECTOR_DIMENSION
}

fn default_index() -> IndexKind {
    IndexKind::Exact
}

fn default_max_connections() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> ServerResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ServerError::ConfigError(format!("Invalid {} value: {}", name, value)))
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("Loaded server configuration");
        Ok(config)
    }

    /// Builds the configuration from any key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("SERVER_HOST") {
            config.bind_address = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            config.port = parse_number("SERVER_PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(provider) = lookup("EMBEDDING_PROVIDER") {
            config.embedding_provider = match provider.trim().to_lowercase().as_str() {
                "hashing" => EmbeddingProvider::Hashing,
                "openai" => EmbeddingProvider::OpenAI,
                other => {
                    return Err(ServerError::ConfigError(format!(
                        "Invalid EMBEDDING_PROVIDER value: {} (expected 'hashing' or 'openai')",
                        other
                    )))
                }
            };
        }
        if let Some(model) = lookup("MODEL_NAME") {
            config.model_name = Some(model);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            config.openai_api_key = Some(key);
        }
        if let Some(dimension) = lookup("VECTOR_DIMENSION") {
            config.vector_dimension = parse_number("VECTOR_DIMENSION", &dimension)?;
        }
        if let Some(index) = lookup("VECTOR_INDEX") {
            config.vector_index = match index.trim().to_lowercase().as_str() {
                "exact" => IndexKind::Exact,
                "hnsw" => IndexKind::Hnsw,
                other => {
                    return Err(ServerError::ConfigError(format!(
                        "Invalid VECTOR_INDEX value: {} (expected 'exact' or 'hnsw')",
                        other
                    )))
                }
            };
        }
        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            config.db_max_connections = parse_number("DB_MAX_CONNECTIONS", &max)?;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_number("REQUEST_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            config.log_format = match format.trim().to_lowercase().as_str() {
                "pretty" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                other => {
                    return Err(ServerError::ConfigError(format!("Invalid LOG_FORMAT value: {}", other)))
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks
    pub fn validate(&self) -> ServerResult<()> {
        if self.vector_dimension == 0 {
            return Err(ServerError::ConfigError(
                "VECTOR_DIMENSION must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::ConfigError(
                "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        if !self.uses_memory_store() && !self.uses_postgres_store() {
            return Err(ServerError::ConfigError(format!(
                "Unsupported DATABASE_URL scheme: {}",
                self.database_url
            )));
        }

        match self.embedding_provider {
            EmbeddingProvider::Hashing => {
                if let Some(model) = self.model_name.as_deref() {
                    if model != HASHING_MODEL {
                        return Err(ServerError::ConfigError(format!(
                            "MODEL_NAME '{}' is not available with the hashing provider (use '{}')",
                            model, HASHING_MODEL
                        )));
                    }
                }
            }
            EmbeddingProvider::OpenAI => {
                if self.openai_api_key.as_deref().map_or(true, str::is_empty) {
                    return Err(ServerError::ConfigError(
                        "OPENAI_API_KEY is required when EMBEDDING_PROVIDER is 'openai'".to_string(),
                    ));
                }
            }
        }

        if self.uses_memory_store() && self.vector_index == IndexKind::Hnsw {
            warn!("VECTOR_INDEX=hnsw has no effect with the in-memory store");
        }
        Ok(())
    }

    /// Model name after applying the provider default
    pub fn effective_model(&self) -> String {
        match (&self.model_name, self.embedding_provider) {
            (Some(model), _) => model.clone(),
            (None, EmbeddingProvider::Hashing) => HASHING_MODEL.to_string(),
            (None, EmbeddingProvider::OpenAI) => DEFAULT_OPENAI_MODEL.to_string(),
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }

    pub fn uses_postgres_store(&self) -> bool {
        self.database_url.starts_with("postgres://") || self.database_url.starts_with("postgresql://")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            embedding_provider: default_provider(),
            model_name: None,
            openai_api_key: None,
            vector_dimension: default_dimension(),
            vector_index: default_index(),
            db_max_connections: default_max_connections(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}
