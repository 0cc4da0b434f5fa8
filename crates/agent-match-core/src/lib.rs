//! Agent registration and semantic matching.
//!
//! Agents are described by [`AgentMetadata`], turned into fixed-length vectors
//! by an [`Embedder`] and kept in a [`VectorStore`] that answers cosine-distance
//! nearest-neighbor queries. [`MatchingService`] composes the two.

pub mod data;
pub mod traits;
pub mod embedding;
pub mod storage;
pub mod services;

pub mod test_utils;

/// Output length of the default model (all-MiniLM-L6-v2 compatible).
pub const DEFAULT_VECTOR_DIMENSION: usize = 384;

/// Number of matches returned when the caller does not ask for a count.
pub const DEFAULT_TOP_K: usize = 5;

pub use data::{AgentId, AgentMetadata, AgentRecord, CoreError, ErrorKind, MatchResult, ScoredRecord};
pub use traits::{Embedder, VectorStore};
pub use embedding::{canonical_text, create_embedder, verify_embedder, EmbedderConfig, HashingEmbedder};
#[cfg(feature = "embed-openai")]
pub use embedding::OpenAIEmbedder;
pub use storage::InMemoryVectorStore;
pub use services::MatchingService;

/// Initialize tracing for library consumers that do not set up their own
/// subscriber (tests, small tools).
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}
