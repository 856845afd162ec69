//! Serializable graph description produced by the loader and consumed by the compiler.

use serde::{Deserialize, Serialize};

use crate::handler::HandlerKey;
use crate::state::ExecutionState;
use crate::store::{InstructionRecord, TopicScope};

/// Prefix of node names derived from topic ids.
pub const TOPIC_NODE_PREFIX: &str = "topic_";

/// Node name for a topic id: `"topic_" + topic_id`.
pub fn topic_node_name(topic_id: &str) -> String {
    format!("{}{}", TOPIC_NODE_PREFIX, topic_id)
}

/// Fixed per-node identity copied into the state before the node's handler runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    pub topic_id: String,
    pub topic_label: String,
    #[serde(default)]
    pub topic_scope: Option<TopicScope>,
    #[serde(default)]
    pub instructions: Vec<InstructionRecord>,
}

impl NodeMetadata {
    /// Overwrites `current_node` and every metadata field of `state`.
    pub fn apply_to(&self, node_name: &str, state: &mut ExecutionState) {
        state.current_node = Some(node_name.to_string());
        state.agent_id = Some(self.agent_id.clone());
        state.agent_name = self.agent_name.clone();
        state.topic_id = Some(self.topic_id.clone());
        state.topic_label = Some(self.topic_label.clone());
        state.topic_scope = self.topic_scope.clone();
        state.instructions = self.instructions.clone();
    }
}

/// One node: unique name, handler key (`module` / `function` on the wire) and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    #[serde(flatten)]
    pub handler: HandlerKey,
    pub metadata: NodeMetadata,
}

/// Directed edge. `condition == None` means unconditional.
///
/// Serialized with `from` / `to` / `condition`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(rename = "from")]
    pub from_node: String,
    pub to: String,
    #[serde(default)]
    pub condition: Option<String>,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from_node: from.into(),
            to: to.into(),
            condition: None,
        }
    }

    pub fn conditional(
        from: impl Into<String>,
        to: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from.into(),
            to: to.into(),
            condition: Some(condition.into()),
        }
    }

    /// Condition label, treating an empty label as no condition.
    pub fn condition_label(&self) -> Option<&str> {
        self.condition.as_deref().filter(|c| !c.is_empty())
    }
}

impl std::fmt::Display for GraphEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.condition_label() {
            Some(c) => write!(f, "{} -[{}]-> {}", self.from_node, c, self.to),
            None => write!(f, "{} -> {}", self.from_node, self.to),
        }
    }
}

/// Ordered node list, edge list and entry node for one agent.
///
/// Rebuilt on every request; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub entry_node: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphSpec {
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }
}
