use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use async_trait::async_trait;

use crate::data::{AgentId, AgentMetadata, AgentRecord, CoreError, ScoredRecord};
use crate::traits::{Embedder, VectorStore};

/// Embedder returning preset vectors keyed by `metadata.name`.
///
/// Unknown names fail with `EmbeddingError`, as does every call once
/// [`FixedEmbedder::failing`] is used.
#[derive(Debug, Default)]
pub struct FixedEmbedder {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
    fail: bool,
    calls: AtomicUsize,
}

impl FixedEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// An embedder whose every call fails.
    pub fn failing(dimension: usize) -> Self {
        Self {
            dimension,
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_vector(mut self, name: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(name.to_string(), vector);
        self
    }

    /// Number of `embed` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, metadata: &AgentMetadata) -> Result<Vec<f32>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::EmbeddingError("model unavailable".to_string()));
        }
        self.vectors
            .get(&metadata.name)
            .cloned()
            .ok_or_else(|| CoreError::EmbeddingError(format!("no vector for '{}'", metadata.name)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        "fixed"
    }
}

/// Vector store whose backend is permanently unreachable.
#[derive(Debug, Clone)]
pub struct FailingVectorStore {
    dimension: usize,
}

impl FailingVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn outage() -> CoreError {
        CoreError::storage_unavailable::<std::io::Error>("connection refused", None)
    }
}

#[async_trait]
impl VectorStore for FailingVectorStore {
    async fn insert(
        &self,
        _id: AgentId,
        _metadata: AgentMetadata,
        _embedding: Vec<f32>,
    ) -> Result<AgentRecord, CoreError> {
        Err(Self::outage())
    }

    async fn query_nearest(&self, _embedding: &[f32], _k: usize) -> Result<Vec<ScoredRecord>, CoreError> {
        Err(Self::outage())
    }

    async fn get(&self, _id: &AgentId) -> Result<Option<AgentRecord>, CoreError> {
        Err(Self::outage())
    }

    async fn count(&self) -> Result<usize, CoreError> {
        Err(Self::outage())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Wraps a real store and fails every `insert` with `StorageUnavailable`.
/// Reads pass through, so callers can check that nothing was written.
#[derive(Clone)]
pub struct InsertFailingStore {
    inner: Arc<dyn VectorStore>,
}

impl InsertFailingStore {
    pub fn new(inner: Arc<dyn VectorStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl VectorStore for InsertFailingStore {
    async fn insert(
        &self,
        _id: AgentId,
        _metadata: AgentMetadata,
        _embedding: Vec<f32>,
    ) -> Result<AgentRecord, CoreError> {
        Err(CoreError::storage_unavailable::<std::io::Error>("connection reset during insert", None))
    }

    async fn query_nearest(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredRecord>, CoreError> {
        self.inner.query_nearest(embedding, k).await
    }

    async fn get(&self, id: &AgentId) -> Result<Option<AgentRecord>, CoreError> {
        self.inner.get(id).await
    }

    async fn count(&self) -> Result<usize, CoreError> {
        self.inner.count().await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
