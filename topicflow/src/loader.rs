//! Structure loader: agent id → [`GraphSpec`].
//!
//! Reads the agent's topics from the injected [`GraphStore`], orders them by scope
//! (ties by topic id) and emits one node per topic chained by unconditional edges.

use std::sync::Arc;

use thiserror::Error;

use crate::graph::{topic_node_name, GraphEdge, GraphNode, GraphSpec, NodeMetadata};
use crate::handler::HandlerKey;
use crate::store::{GraphStore, StoreError, TopicRecord};

/// Error loading an agent's structure.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The agent is unknown or has no topics; the agent is misconfigured.
    #[error("no topics found for agent {agent_id}; cannot build a graph")]
    NoGraphData { agent_id: String },

    /// The store query failed.
    #[error("loading structure for agent {agent_id}: {source}")]
    Store {
        agent_id: String,
        #[source]
        source: StoreError,
    },
}

/// Builds graph specs from the property-graph store.
///
/// **Interaction**: Holds an `Arc<dyn GraphStore>`; produces [`GraphSpec`] for
/// [`GraphCompiler`](crate::graph::GraphCompiler). Read-only.
#[derive(Clone)]
pub struct StructureLoader {
    store: Arc<dyn GraphStore>,
}

impl StructureLoader {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Loads `agent_id`'s topics and assembles the linear graph spec.
    pub async fn load(&self, agent_id: &str) -> Result<GraphSpec, LoadError> {
        let rows = self
            .store
            .topic_rows(agent_id)
            .await
            .map_err(|source| LoadError::Store {
                agent_id: agent_id.to_string(),
                source,
            })?;
        let topics: Vec<TopicRecord> = rows.into_iter().filter_map(|r| r.into_topic()).collect();
        let spec = build_spec(agent_id, topics)?;
        tracing::debug!(
            agent_id = agent_id,
            entry = %spec.entry_node,
            nodes = ?spec.node_names(),
            edges = spec.edges.len(),
            "graph structure loaded"
        );
        Ok(spec)
    }
}

/// Orders topics by scope then id; topics without a scope go last.
pub fn sort_topics(topics: &mut [TopicRecord]) {
    topics.sort_by(|a, b| {
        (a.scope.is_none(), &a.scope, &a.id).cmp(&(b.scope.is_none(), &b.scope, &b.id))
    });
}

/// Builds the linear spec for already-fetched topics.
///
/// Fails with [`LoadError::NoGraphData`] when `topics` is empty.
pub fn build_spec(agent_id: &str, mut topics: Vec<TopicRecord>) -> Result<GraphSpec, LoadError> {
    if topics.is_empty() {
        return Err(LoadError::NoGraphData {
            agent_id: agent_id.to_string(),
        });
    }
    sort_topics(&mut topics);

    let nodes: Vec<GraphNode> = topics
        .into_iter()
        .map(|topic| GraphNode {
            name: topic_node_name(&topic.id),
            handler: HandlerKey::topic(),
            metadata: NodeMetadata {
                agent_id: topic.agent_id,
                agent_name: topic.agent_name,
                topic_id: topic.id,
                topic_label: topic.label,
                topic_scope: topic.scope,
                instructions: topic.instructions,
            },
        })
        .collect();
    let edges = nodes
        .windows(2)
        .map(|pair| GraphEdge::new(pair[0].name.clone(), pair[1].name.clone()))
        .collect();

    Ok(GraphSpec {
        entry_node: nodes[0].name.clone(),
        nodes,
        edges,
    })
}
