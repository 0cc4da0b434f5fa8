use async_trait::async_trait;

use crate::data::{AgentMetadata, CoreError};
use crate::embedding::canonical_text;
use crate::traits::Embedder;

const MODEL_ID: &str = "feature-hash-v1";
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Local embedder based on signed feature hashing.
///
/// Lowercased word unigrams and bigrams of the canonical text are hashed with
/// FNV-1a into `dimension` buckets, the top hash bit picks the sign, and the
/// result is L2-normalized. The mapping depends only on the input bytes, so
/// vectors are identical across runs, processes and platforms.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, CoreError> {
        if dimension == 0 {
            return Err(CoreError::ValidationError(
                "embedding dimension must be at least 1".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    /// Synchronous embedding of already-canonical text.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, CoreError> {
        hash_embed(text, self.dimension)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(FNV_PRIME))
}

fn add_feature(embedding: &mut [f32], feature: &str, weight: f32) {
    let hash = fnv1a(feature.as_bytes());
    let bucket = (hash % embedding.len() as u64) as usize;
    let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
    embedding[bucket] += sign * weight;
}

fn hash_embed(text: &str, dimension: usize) -> Result<Vec<f32>, CoreError> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut embedding = vec![0.0f32; dimension];
    for token in &tokens {
        add_feature(&mut embedding, token, 1.0);
    }
    for pair in tokens.windows(2) {
        add_feature(&mut embedding, &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
    }

    let magnitude = embedding.iter().map(|&v| v * v).sum::<f32>().sqrt();
    if magnitude == 0.0 {
        return Err(CoreError::EmbeddingError(
            "input text produced no features".to_string(),
        ));
    }
    for value in &mut embedding {
        *value /= magnitude;
    }

    Ok(embedding)
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, metadata: &AgentMetadata) -> Result<Vec<f32>, CoreError> {
        let text = canonical_text(metadata);
        let dimension = self.dimension;

        tokio::task::spawn_blocking(move || hash_embed(&text, dimension))
            .await
            .map_err(|e| CoreError::EmbeddingError(format!("embedding task failed: {}", e)))?
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        MODEL_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::cosine_distance;

    fn alpha() -> AgentMetadata {
        AgentMetadata {
            name: "Alpha".to_string(),
            description: "data pipeline".to_string(),
            capabilities: vec!["extract".to_string(), "load".to_string()],
            agent_type: "etl".to_string(),
            dependencies: vec!["db".to_string()],
        }
    }

    fn chat_bot() -> AgentMetadata {
        AgentMetadata {
            name: "Chatty".to_string(),
            description: "conversational chat bot for customer support".to_string(),
            capabilities: vec!["converse".to_string(), "answer questions".to_string()],
            agent_type: "chat".to_string(),
            dependencies: vec!["llm".to_string()],
        }
    }

    #[tokio::test]
    async fn test_embedding_is_deterministic() {
        let embedder = HashingEmbedder::new(384).unwrap();

        let first = embedder.embed(&alpha()).await.unwrap();
        let second = embedder.embed(&alpha()).await.unwrap();
        assert_eq!(first, second, "Embeddings should be bit-identical");

        let other = HashingEmbedder::new(384).unwrap();
        assert_eq!(first, other.embed(&alpha()).await.unwrap());
    }

    #[tokio::test]
    async fn test_embedding_has_configured_dimension_and_unit_norm() {
        let embedder = HashingEmbedder::new(384).unwrap();
        let embedding = embedder.embed(&alpha()).await.unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!(embedding.iter().all(|v| v.is_finite()));
    }

    #[tokio::test]
    async fn test_related_metadata_is_closer_than_unrelated() {
        let embedder = HashingEmbedder::new(384).unwrap();
        let mut alpha_variant = alpha();
        alpha_variant.name = "Alpha Two".to_string();

        let a = embedder.embed(&alpha()).await.unwrap();
        let variant = embedder.embed(&alpha_variant).await.unwrap();
        let chat = embedder.embed(&chat_bot()).await.unwrap();

        assert_ne!(a, variant);
        assert!(cosine_distance(&a, &variant) < cosine_distance(&a, &chat));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        assert!(matches!(HashingEmbedder::new(0), Err(CoreError::ValidationError(_))));
    }

    #[test]
    fn test_empty_text_fails() {
        let embedder = HashingEmbedder::new(16).unwrap();
        assert!(matches!(embedder.embed_text("  ,, "), Err(CoreError::EmbeddingError(_))));
    }

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
