//! Embedders and the canonical text form they consume

use std::sync::Arc;
use tracing::info;

use crate::data::{AgentMetadata, CoreError};
use crate::traits::Embedder;

mod hashing;
mod openai;

pub use hashing::HashingEmbedder;
#[cfg(feature = "embed-openai")]
pub use openai::OpenAIEmbedder;

/// Separator between entries of `capabilities` and `dependencies`.
pub const LIST_SEPARATOR: &str = ", ";

/// Rendering of an empty list. Escaping never emits a backslash followed by
/// `0`, so no list with entries (even `[""]`) can render to this.
pub const EMPTY_LIST: &str = "\\0";

/// Renders metadata as the single text form every embedder consumes.
///
/// Field order is fixed (name, description, capabilities, type, dependencies).
/// Backslashes, commas and line breaks inside values are escaped, so a value
/// cannot imitate a list boundary or another field's line. An empty list
/// renders as [`EMPTY_LIST`], so distinct metadata always yields distinct
/// text.
pub fn canonical_text(metadata: &AgentMetadata) -> String {
    format!(
        "Name: {}\nDescription: {}\nCapabilities: {}\nType: {}\nDependencies: {}",
        escape_value(&metadata.name),
        escape_value(&metadata.description),
        join_list(&metadata.capabilities),
        escape_value(&metadata.agent_type),
        join_list(&metadata.dependencies),
    )
}

fn join_list(values: &[String]) -> String {
    if values.is_empty() {
        return EMPTY_LIST.to_string();
    }
    values
        .iter()
        .map(|v| escape_value(v))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Configuration for embedders
#[derive(Debug, Clone)]
pub enum EmbedderConfig {
    /// Local feature-hashing embedder; no model download or network access
    Hashing {
        dimension: usize,
    },
    /// Remote model behind the OpenAI embeddings API (feature `embed-openai`)
    OpenAI {
        api_key: String,
        model: String,
        dimension: usize,
    },
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self::Hashing {
            dimension: crate::DEFAULT_VECTOR_DIMENSION,
        }
    }
}

/// Create an embedder from the provided configuration
pub fn create_embedder(config: EmbedderConfig) -> Result<Arc<dyn Embedder>, CoreError> {
    match config {
        EmbedderConfig::Hashing { dimension } => Ok(Arc::new(HashingEmbedder::new(dimension)?)),
        #[cfg(feature = "embed-openai")]
        EmbedderConfig::OpenAI { api_key, model, dimension } => {
            Ok(Arc::new(OpenAIEmbedder::new(api_key, model, dimension)))
        }
        #[cfg(not(feature = "embed-openai"))]
        EmbedderConfig::OpenAI { .. } => Err(CoreError::Internal(
            "OpenAI embedder is not available because the 'embed-openai' feature is not enabled"
                .to_string(),
        )),
    }
}

/// Embeds a fixed sample record and checks the output length against
/// `expected_dimension`.
///
/// Run at startup so a model whose real output disagrees with the configured
/// dimension fails before any request is served.
pub async fn verify_embedder(embedder: &dyn Embedder, expected_dimension: usize) -> Result<(), CoreError> {
    if embedder.dimension() != expected_dimension {
        return Err(CoreError::dimension_mismatch(expected_dimension, embedder.dimension()));
    }

    let sample = AgentMetadata {
        name: "sample".to_string(),
        description: "startup dimension check".to_string(),
        capabilities: vec!["sample".to_string()],
        agent_type: "sample".to_string(),
        dependencies: vec![],
    };
    let vector = embedder.embed(&sample).await?;
    if vector.len() != expected_dimension {
        return Err(CoreError::dimension_mismatch(expected_dimension, vector.len()));
    }

    info!(model = embedder.model_id(), dimension = expected_dimension, "Embedder verified");
    Ok(())
}
