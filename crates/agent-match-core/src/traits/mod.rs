//! Core traits (interfaces) for agent matching

mod embedder;
pub mod vector_store;

pub use embedder::Embedder;
pub use vector_store::VectorStore;
