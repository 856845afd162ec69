//! Flow graph: spec, compile and invoke.
//!
//! A [`GraphSpec`] (nodes + edges + entry) is compiled by [`GraphCompiler`] into an
//! immutable [`CompiledGraph`], which [`ExecutionEngine`] walks with an
//! [`ExecutionState`](crate::state::ExecutionState).

mod compile_error;
mod compiled;
mod compiler;
mod engine;
pub mod logging;
mod node_shim;
mod spec;

pub use compile_error::CompilationError;
pub use compiled::{CompiledGraph, GraphShape, Transition};
pub use compiler::GraphCompiler;
pub use engine::{ExecutionEngine, StepEvent, DEFAULT_MAX_STEPS};
pub use node_shim::MetadataShim;
pub use spec::{topic_node_name, GraphEdge, GraphNode, GraphSpec, NodeMetadata, TOPIC_NODE_PREFIX};
