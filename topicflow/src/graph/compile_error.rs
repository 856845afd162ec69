//! Graph compilation error.
//!
//! Returned by `GraphCompiler::compile` when the graph spec is structurally inconsistent or a
//! handler cannot be resolved. Structural checks all run before any handler resolution.

use thiserror::Error;

use crate::handler::HandlerResolutionError;

/// Error when compiling a [`GraphSpec`](super::GraphSpec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// An edge endpoint names no node.
    #[error("dangling edge {from} -> {to}: unknown node {missing}")]
    DanglingEdge {
        from: String,
        to: String,
        condition: Option<String>,
        missing: String,
    },

    /// Two nodes share a name.
    #[error("duplicate node name: {0}")]
    DuplicateNode(String),

    /// The entry node is not among the nodes.
    #[error("entry node not found: {0}")]
    UnknownEntry(String),

    /// A node has both conditional and unconditional outgoing edges.
    #[error("node {0} has both conditional and unconditional outgoing edges")]
    MixedTransitions(String),

    /// A node has more than one unconditional outgoing edge.
    #[error("node {node} has more than one unconditional outgoing edge ({first}, {second})")]
    MultipleUnconditional {
        node: String,
        first: String,
        second: String,
    },

    /// A node lists the same condition label twice.
    #[error("node {node} has duplicate condition {condition}")]
    DuplicateCondition { node: String, condition: String },

    /// A node's handler could not be resolved.
    #[error("node {node}: {source}")]
    HandlerResolution {
        node: String,
        #[source]
        source: HandlerResolutionError,
    },
}
