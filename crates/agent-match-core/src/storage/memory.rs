use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::data::{AgentId, AgentMetadata, AgentRecord, CoreError, ScoredRecord};
use crate::storage::{cosine_distance_with_norms, validate_vector};
use crate::traits::VectorStore;

struct StoredVector {
    record: AgentRecord,
    norm: f64,
}

#[derive(Default)]
struct Inner {
    // Insertion order; ties in query results resolve by position here.
    records: Vec<StoredVector>,
    slots: HashMap<AgentId, usize>,
}

/// In-memory vector store with an exact brute-force scan.
///
/// Inserts are validated before the write lock is taken and applied in one
/// step with no await point under the lock, so a failed or cancelled insert
/// never leaves a partial record. A query issued after `insert` returns sees
/// the new record.
#[derive(Clone)]
pub struct InMemoryVectorStore {
    dimension: usize,
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(
        &self,
        id: AgentId,
        metadata: AgentMetadata,
        embedding: Vec<f32>,
    ) -> Result<AgentRecord, CoreError> {
        let norm = validate_vector(&embedding, self.dimension)?;

        let mut inner = self.inner.write().await;
        if inner.slots.contains_key(&id) {
            return Err(CoreError::DuplicateId(id));
        }

        let record = AgentRecord {
            id,
            metadata,
            embedding,
            created_at: Utc::now(),
        };
        let slot = inner.records.len();
        inner.records.push(StoredVector {
            record: record.clone(),
            norm,
        });
        inner.slots.insert(id, slot);

        debug!(agent_id = %id, slot, "Stored agent vector");
        Ok(record)
    }

    async fn query_nearest(&self, embedding: &[f32], k: usize) -> Result<Vec<ScoredRecord>, CoreError> {
        if k == 0 {
            return Err(CoreError::ValidationError("k must be at least 1".to_string()));
        }
        let query_norm = validate_vector(embedding, self.dimension)?;

        let inner = self.inner.read().await;
        let mut scored: Vec<(usize, f64)> = inner
            .records
            .iter()
            .enumerate()
            .map(|(slot, stored)| {
                let distance = cosine_distance_with_norms(
                    embedding,
                    query_norm,
                    &stored.record.embedding,
                    stored.norm,
                );
                (slot, distance)
            })
            .collect();

        // Distances are finite after validation; sort_by is stable, so equal
        // distances keep insertion order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(slot, distance)| ScoredRecord {
                record: inner.records[slot].record.clone(),
                distance,
            })
            .collect())
    }

    async fn get(&self, id: &AgentId) -> Result<Option<AgentRecord>, CoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .slots
            .get(id)
            .map(|&slot| inner.records[slot].record.clone()))
    }

    async fn count(&self) -> Result<usize, CoreError> {
        Ok(self.inner.read().await.records.len())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
