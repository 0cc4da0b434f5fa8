//! Agent records and match results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{errors::CoreError, identifiers::AgentId};

/// Structured description of an agent.
///
/// Every field is required; serde rejects missing or `null` fields before a
/// value of this type can exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetadata {
    /// Display name of the agent
    pub name: String,

    /// Free-form description of what the agent does
    pub description: String,

    /// Ordered list of capabilities (e.g. "extract", "load")
    pub capabilities: Vec<String>,

    /// Agent category (e.g. "etl", "chat")
    pub agent_type: String,

    /// Ordered list of systems the agent depends on
    pub dependencies: Vec<String>,
}

impl AgentMetadata {
    /// Checks the constraints serde cannot express. Only `name` may not be
    /// blank; list entries and other strings may be empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "metadata.name must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// A stored agent: caller id, metadata and the derived embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: AgentId,
    pub metadata: AgentMetadata,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

/// A record returned by a nearest-neighbor query with its cosine distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: AgentRecord,
    pub distance: f64,
}

impl ScoredRecord {
    /// Cosine similarity, `1 - distance`.
    pub fn similarity(&self) -> f64 {
        1.0 - self.distance
    }
}

/// One entry of a match response. Computed per query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: AgentId,
    pub metadata: AgentMetadata,
    pub similarity_score: f64,
}

impl From<ScoredRecord> for MatchResult {
    fn from(scored: ScoredRecord) -> Self {
        let similarity_score = scored.similarity();
        Self {
            id: scored.record.id,
            metadata: scored.record.metadata,
            similarity_score,
        }
    }
}
