//! VectorStore trait definition for record persistence and similarity queries

use async_trait::async_trait;
use crate::data::{AgentId, AgentMetadata, AgentRecord, CoreError, ScoredRecord};

/// Persists `(id, metadata, embedding)` triples and answers k-nearest-neighbor
/// queries by cosine distance.
///
/// Implementations share the checks in [`crate::storage::validate_vector`] so
/// every backend rejects the same inputs with the same error kinds.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Persists a new record.
    ///
    /// Contract: the vector must have [`VectorStore::dimension`] entries
    /// (`DimensionMismatch`), all finite with a non-zero norm
    /// (`ValidationError`), and `id` must not be stored yet (`DuplicateId`).
    /// The record and its embedding are written in one transaction, so any
    /// failure leaves the store unchanged. Not idempotent: repeating a
    /// committed insert returns `DuplicateId`.
    async fn insert(
        &self,
        id: AgentId,
        metadata: AgentMetadata,
        embedding: Vec<f32>,
    ) -> Result<AgentRecord, CoreError>;

    /// Returns up to `k` records ordered by ascending cosine distance to
    /// `embedding`, ties broken by insertion order.
    ///
    /// Contract: `k` must be at least 1 and is clamped to the number of stored
    /// records. The query vector is checked like an inserted one.
    async fn query_nearest(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredRecord>, CoreError>;

    /// Looks up a single record by id.
    async fn get(&self, id: &AgentId) -> Result<Option<AgentRecord>, CoreError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, CoreError>;

    /// Configured vector dimension.
    fn dimension(&self) -> usize;
}
