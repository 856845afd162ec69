//! Graph compiler: validates a [`GraphSpec`], wires handlers and builds the routing table.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::handler::HandlerResolver;

use super::compile_error::CompilationError;
use super::compiled::{CompiledGraph, CompiledNode, Transition};
use super::node_shim::MetadataShim;
use super::spec::GraphSpec;

/// Turns graph specs into compiled graphs.
///
/// Compilation is all-or-nothing: the graph spec is fully validated before any handler is
/// resolved, and any resolution failure discards the partial result.
///
/// **Interaction**: Resolves handlers through the injected [`HandlerResolver`];
/// produces [`CompiledGraph`] for [`ExecutionEngine`](super::ExecutionEngine).
#[derive(Clone)]
pub struct GraphCompiler {
    resolver: Arc<dyn HandlerResolver>,
}

impl GraphCompiler {
    pub fn new(resolver: Arc<dyn HandlerResolver>) -> Self {
        Self { resolver }
    }

    /// Validates `spec`, resolves and wraps every node's handler, and classifies edges.
    pub fn compile(&self, spec: &GraphSpec) -> Result<CompiledGraph, CompilationError> {
        let transitions = classify_edges(spec)?;

        let mut nodes = HashMap::with_capacity(spec.nodes.len());
        for node in &spec.nodes {
            let raw = self
                .resolver
                .resolve(&node.handler.module, &node.handler.function)
                .map_err(|source| CompilationError::HandlerResolution {
                    node: node.name.clone(),
                    source,
                })?;
            let shim = MetadataShim::new(node.name.clone(), node.metadata.clone(), raw);
            nodes.insert(
                node.name.clone(),
                Arc::new(CompiledNode {
                    key: node.handler.clone(),
                    handler: Arc::new(shim),
                }),
            );
        }

        tracing::debug!(
            entry = %spec.entry_node,
            nodes = nodes.len(),
            transitions = transitions.len(),
            "graph compiled"
        );

        Ok(CompiledGraph {
            nodes,
            transitions,
            entry: spec.entry_node.clone(),
        })
    }
}

/// Structural validation plus edge classification. Resolves nothing.
fn classify_edges(spec: &GraphSpec) -> Result<HashMap<String, Transition>, CompilationError> {
    let mut names = HashSet::with_capacity(spec.nodes.len());
    for node in &spec.nodes {
        if !names.insert(node.name.as_str()) {
            return Err(CompilationError::DuplicateNode(node.name.clone()));
        }
    }
    if !names.contains(spec.entry_node.as_str()) {
        return Err(CompilationError::UnknownEntry(spec.entry_node.clone()));
    }

    for edge in &spec.edges {
        let missing = [&edge.from_node, &edge.to]
            .into_iter()
            .find(|n| !names.contains(n.as_str()));
        if let Some(missing) = missing {
            return Err(CompilationError::DanglingEdge {
                from: edge.from_node.clone(),
                to: edge.to.clone(),
                condition: edge.condition.clone(),
                missing: missing.clone(),
            });
        }
    }

    let mut direct: HashMap<&str, &str> = HashMap::new();
    let mut routed: HashMap<&str, BTreeMap<String, String>> = HashMap::new();
    for edge in &spec.edges {
        let from = edge.from_node.as_str();
        match edge.condition_label() {
            None => {
                if let Some(first) = direct.insert(from, edge.to.as_str()) {
                    return Err(CompilationError::MultipleUnconditional {
                        node: from.to_string(),
                        first: first.to_string(),
                        second: edge.to.clone(),
                    });
                }
            }
            Some(condition) => {
                let branches = routed.entry(from).or_default();
                if branches
                    .insert(condition.to_string(), edge.to.clone())
                    .is_some()
                {
                    return Err(CompilationError::DuplicateCondition {
                        node: from.to_string(),
                        condition: condition.to_string(),
                    });
                }
            }
        }
    }

    if let Some(edge) = spec
        .edges
        .iter()
        .find(|e| direct.contains_key(e.from_node.as_str()) && routed.contains_key(e.from_node.as_str()))
    {
        return Err(CompilationError::MixedTransitions(edge.from_node.clone()));
    }

    let mut transitions: HashMap<String, Transition> = direct
        .into_iter()
        .map(|(from, to)| (from.to_string(), Transition::Direct(to.to_string())))
        .collect();
    transitions.extend(
        routed
            .into_iter()
            .map(|(from, branches)| (from.to_string(), Transition::Route(branches))),
    );
    Ok(transitions)
}
