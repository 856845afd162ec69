//! # Graph store: the read side of the property-graph database
//!
//! The loader never talks to a database directly; it is handed an
//! `Arc<dyn GraphStore>` at construction. Implementations:
//!
//! | Type                 | Backend                              | Feature |
//! |----------------------|--------------------------------------|---------|
//! | [`InMemoryGraphStore`] | In-memory, optionally from a JSON fixture | —       |
//! | `Neo4jHttpStore`     | Neo4j HTTP transactional endpoint    | `neo4j` |
//!
//! Both answer the same structure query (see [`cypher::STRUCTURE_QUERY`]) and return
//! its rows unchanged; filtering and ordering are the loader's job.

pub mod cypher;
mod memory;
#[cfg(feature = "neo4j")]
mod neo4j;
mod record;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::{Fixture, FixtureAgent, InMemoryGraphStore};
#[cfg(feature = "neo4j")]
pub use neo4j::Neo4jHttpStore;
pub use record::{InstructionRecord, InstructionRow, TopicRecord, TopicRow, TopicScope};

/// Error from a graph store query.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure talking to the store.
    #[error("store request failed: {0}")]
    Request(String),

    /// The store rejected the query.
    #[error("store query error {code}: {message}")]
    Query { code: String, message: String },

    /// The response did not have the expected shape.
    #[error("unexpected store response: {0}")]
    Decode(String),

    /// A fixture file could not be read or parsed.
    #[error("fixture error: {0}")]
    Fixture(String),
}

/// Read-only access to agent structure in the property-graph store.
///
/// **Interaction**: Injected into [`StructureLoader`](crate::loader::StructureLoader).
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Returns the structure query rows for `agent_id`: one row per topic, or a single
    /// row with no topic when the agent has none, or no rows when the agent is unknown.
    async fn topic_rows(&self, agent_id: &str) -> Result<Vec<TopicRow>, StoreError>;
}
