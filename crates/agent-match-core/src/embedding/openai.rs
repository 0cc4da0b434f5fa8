#[cfg(feature = "embed-openai")]
use async_openai::{
    config::OpenAIConfig,
    types::{CreateEmbeddingRequestArgs, EmbeddingInput},
    Client,
};
#[cfg(feature = "embed-openai")]
use async_trait::async_trait;

#[cfg(feature = "embed-openai")]
use crate::data::{AgentMetadata, CoreError};
#[cfg(feature = "embed-openai")]
use crate::embedding::canonical_text;
#[cfg(feature = "embed-openai")]
use crate::traits::Embedder;

/// Embedder backed by the OpenAI embeddings API.
///
/// `dimension` must match the model's real output length; every response is
/// checked against it.
#[cfg(feature = "embed-openai")]
pub struct OpenAIEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dimension: usize,
}

#[cfg(feature = "embed-openai")]
impl OpenAIEmbedder {
    pub fn new(api_key: String, model: String, dimension: usize) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);
        Self { client, model, dimension }
    }
}

#[cfg(feature = "embed-openai")]
#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, metadata: &AgentMetadata) -> Result<Vec<f32>, CoreError> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.model)
            .input(EmbeddingInput::String(canonical_text(metadata)))
            .build()
            .map_err(|e| CoreError::EmbeddingError(e.to_string()))?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| CoreError::EmbeddingError(e.to_string()))?;

        let embedding = response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| CoreError::EmbeddingError("empty embedding response".to_string()))?;

        if embedding.len() != self.dimension {
            return Err(CoreError::dimension_mismatch(self.dimension, embedding.len()));
        }
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
