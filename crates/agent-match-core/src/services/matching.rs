use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::data::{AgentId, AgentMetadata, AgentRecord, CoreError, MatchResult};
use crate::traits::{Embedder, VectorStore};

/// Registers agents and answers similarity queries.
///
/// Holds nothing but the two shared components, so clones are cheap and may
/// be handed to every request task.
#[derive(Clone)]
pub struct MatchingService {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl MatchingService {
    /// Fails with `DimensionMismatch` when the embedder's output length
    /// differs from the store's vector dimension.
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Result<Self, CoreError> {
        if embedder.dimension() != store.dimension() {
            return Err(CoreError::dimension_mismatch(store.dimension(), embedder.dimension()));
        }
        Ok(Self { embedder, store })
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Embeds `metadata` and stores it under `id`.
    ///
    /// On any error nothing is stored.
    #[instrument(skip(self, metadata), fields(agent_id = %id, name = %metadata.name))]
    pub async fn register(&self, id: AgentId, metadata: AgentMetadata) -> Result<AgentId, CoreError> {
        metadata.validate()?;

        let embedding = self.embedder.embed(&metadata).await.map_err(|e| {
            warn!(error = %e, "Embedding failed during registration");
            e
        })?;

        match self.store.insert(id, metadata, embedding).await {
            Ok(record) => {
                info!("Agent registered");
                Ok(record.id)
            }
            Err(e) => {
                warn!(error = %e, "Failed to store agent");
                Err(e)
            }
        }
    }

    /// Returns up to `top_k` stored agents ordered by descending similarity to
    /// `query`. The query need not describe a registered agent.
    #[instrument(skip(self, query), fields(name = %query.name))]
    pub async fn find_matches(&self, query: &AgentMetadata, top_k: usize) -> Result<Vec<MatchResult>, CoreError> {
        query.validate()?;
        if top_k == 0 {
            return Err(CoreError::ValidationError("top_k must be at least 1".to_string()));
        }

        let embedding = self.embedder.embed(query).await.map_err(|e| {
            warn!(error = %e, "Embedding failed during matching");
            e
        })?;

        let scored = self.store.query_nearest(&embedding, top_k).await.map_err(|e| {
            warn!(error = %e, "Nearest-neighbor query failed");
            e
        })?;

        let results: Vec<MatchResult> = scored.into_iter().map(MatchResult::from).collect();
        info!(matches = results.len(), "Matching completed");
        Ok(results)
    }

    /// Matches against the stored metadata of a registered agent.
    ///
    /// The agent itself is part of the candidate set and normally ranks first.
    #[instrument(skip(self), fields(agent_id = %id))]
    pub async fn find_matches_for_agent(&self, id: &AgentId, top_k: usize) -> Result<Vec<MatchResult>, CoreError> {
        let record = self.store.get(id).await?.ok_or_else(|| {
            warn!("Agent not registered");
            CoreError::NotFound(*id)
        })?;

        self.find_matches(&record.metadata, top_k).await
    }

    #[instrument(skip(self), fields(agent_id = %id))]
    pub async fn get_agent(&self, id: &AgentId) -> Result<Option<AgentRecord>, CoreError> {
        self.store.get(id).await
    }
}
