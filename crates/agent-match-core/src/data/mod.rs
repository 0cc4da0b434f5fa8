//! Core data structures for agent registration and matching

pub mod identifiers;
pub mod entities;
pub mod errors;

// Re-export all common types
pub use identifiers::AgentId;
pub use entities::{AgentMetadata, AgentRecord, MatchResult, ScoredRecord};
pub use errors::{CoreError, ErrorKind};
