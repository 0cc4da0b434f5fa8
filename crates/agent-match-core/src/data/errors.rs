//! Error types for agent registration and matching

use thiserror::Error;

use crate::data::identifiers::AgentId;

/// Base error type for core operations.
///
/// Embedder and vector store failures travel through the matching service
/// unchanged, so callers can branch on the variant (or on [`CoreError::kind`]).
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Embedding generation error: {0}")]
    EmbeddingError(String),

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Agent already registered: {0}")]
    DuplicateId(AgentId),

    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid input: {0}")]
    ValidationError(String),

    #[error("Agent not found: {0}")]
    NotFound(AgentId),

    #[error("Internal system error: {0}")]
    Internal(String),
}

/// Copyable tag for [`CoreError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Embedding,
    DimensionMismatch,
    DuplicateId,
    StorageUnavailable,
    Validation,
    NotFound,
    Internal,
}

impl CoreError {
    /// Helper to create a storage error that keeps the driver error as source
    pub fn storage_unavailable<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CoreError::StorageUnavailable {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        CoreError::DimensionMismatch { expected, actual }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::EmbeddingError(_) => ErrorKind::Embedding,
            CoreError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            CoreError::DuplicateId(_) => ErrorKind::DuplicateId,
            CoreError::StorageUnavailable { .. } => ErrorKind::StorageUnavailable,
            CoreError::ValidationError(_) => ErrorKind::Validation,
            CoreError::NotFound(_) => ErrorKind::NotFound,
            CoreError::Internal(_) => ErrorKind::Internal,
        }
    }
}
