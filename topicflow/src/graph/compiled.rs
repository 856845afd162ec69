//! Compiled graph: immutable, ready for the execution engine.
//!
//! Built by `GraphCompiler::compile`. Holds the wrapped handler per node, the routing
//! table and the entry node.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::ExecutionError;
use crate::handler::{Handler, HandlerKey};
use crate::state::ExecutionState;

/// Outgoing routing rule of one node. Nodes without a transition are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Always move to the target.
    Direct(String),
    /// Pick the target by the state's `intent` (condition label → target).
    Route(BTreeMap<String, String>),
}

/// Comparable view of a compiled graph: node handlers, routing table, entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphShape {
    pub entry: String,
    pub nodes: BTreeMap<String, HandlerKey>,
    pub transitions: BTreeMap<String, Transition>,
}

pub(crate) struct CompiledNode {
    pub(crate) key: HandlerKey,
    pub(crate) handler: Arc<dyn Handler>,
}

/// Compiled graph: immutable structure, consumed by
/// [`ExecutionEngine`](super::ExecutionEngine).
///
/// `Send + Sync`; one instance can serve concurrent walks as long as each walk owns
/// its state.
#[derive(Clone)]
pub struct CompiledGraph {
    pub(crate) nodes: HashMap<String, Arc<CompiledNode>>,
    pub(crate) transitions: HashMap<String, Transition>,
    pub(crate) entry: String,
}

impl CompiledGraph {
    pub fn entry_node(&self) -> &str {
        &self.entry
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Node names, sorted.
    pub fn node_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn transition(&self, node: &str) -> Option<&Transition> {
        self.transitions.get(node)
    }

    pub fn shape(&self) -> GraphShape {
        GraphShape {
            entry: self.entry.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|(name, node)| (name.clone(), node.key.clone()))
                .collect(),
            transitions: self
                .transitions
                .iter()
                .map(|(name, t)| (name.clone(), t.clone()))
                .collect(),
        }
    }

    pub(crate) fn handler(&self, node: &str) -> Result<&Arc<dyn Handler>, ExecutionError> {
        self.nodes
            .get(node)
            .map(|n| &n.handler)
            .ok_or_else(|| ExecutionError::MissingNode(node.to_string()))
    }

    /// Chooses the node after `node` given the state its handler returned.
    ///
    /// `Ok(None)` means `node` is terminal.
    pub(crate) fn next_node(
        &self,
        node: &str,
        state: &ExecutionState,
    ) -> Result<Option<String>, ExecutionError> {
        match self.transitions.get(node) {
            None => Ok(None),
            Some(Transition::Direct(to)) => Ok(Some(to.clone())),
            Some(Transition::Route(branches)) => state
                .intent
                .as_deref()
                .and_then(|intent| branches.get(intent))
                .map(|to| Some(to.clone()))
                .ok_or_else(|| ExecutionError::Routing {
                    node: node.to_string(),
                    intent: state.intent.clone(),
                    conditions: branches.keys().cloned().collect(),
                }),
        }
    }
}

impl std::fmt::Debug for CompiledGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("entry", &self.entry)
            .field("nodes", &self.node_names())
            .field("transitions", &self.transitions)
            .finish()
    }
}
