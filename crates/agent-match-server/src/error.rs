//! Error types for the agent matching server

use thiserror::Error;

use agent_match_core::CoreError;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failure reported by the embedder, the store or the matching service
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Listener or socket failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;
