//! Embedder trait definition for metadata embeddings

use async_trait::async_trait;
use crate::data::{AgentMetadata, CoreError};

/// Maps agent metadata to a fixed-length real vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generates the embedding for `metadata`.
    ///
    /// Contract: identical metadata yields an identical vector for a fixed model
    /// version, and the vector length always equals [`Embedder::dimension`].
    /// Implementations embed the canonical text form (see
    /// [`crate::embedding::canonical_text`]), never an ad-hoc rendering.
    async fn embed(&self, metadata: &AgentMetadata) -> Result<Vec<f32>, CoreError>;

    /// Length of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Identifier of the underlying model, reported by health checks.
    fn model_id(&self) -> &str;
}
