//! Services composing the embedder and the vector store

pub mod matching;

pub use matching::MatchingService;
