//! # topicflow
//!
//! Turns an agent's persisted topic hierarchy into an executable flow graph at request
//! time and runs it against caller-supplied state. One state type flows
//! **state-in, state-out** through every node.
//!
//! ## Pipeline
//!
//! ```text
//! agent id ─▶ StructureLoader ─▶ GraphSpec ─▶ GraphCompiler ─▶ CompiledGraph ─▶ ExecutionEngine ─▶ final state
//!                  │                               │
//!             GraphStore                    HandlerRegistry
//! ```
//!
//! ## Main Modules
//!
//! - [`store`]: `GraphStore` trait, `InMemoryGraphStore`, optional `Neo4jHttpStore`.
//! - [`loader`]: `StructureLoader`, topics ordered by scope → linear `GraphSpec`.
//! - [`handler`]: `Handler` trait, static `HandlerRegistry`, built-in `TopicHandler`.
//! - [`graph`]: `GraphSpec`, `GraphCompiler`, `CompiledGraph`, `ExecutionEngine`.
//! - [`runtime`]: `FlowRuntime`, load → compile → invoke as one call.
//! - [`config`]: `FlowConfig::from_env`.
//!
//! ## Features
//!
//! - `neo4j`: Neo4j store over the HTTP transactional endpoint (reqwest).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use topicflow::{ExecutionState, FlowRuntime, HandlerRegistry, InMemoryGraphStore, TopicRecord};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut store = InMemoryGraphStore::new();
//! store
//!     .add_agent("A", "Support")
//!     .add_topic("A", TopicRecord::new("T1", "Greeting", 1).with_instruction("I1", "Say hello"))
//!     .add_topic("A", TopicRecord::new("T2", "Billing", 2));
//!
//! let runtime = FlowRuntime::new(Arc::new(store), Arc::new(HandlerRegistry::with_builtins()));
//! let out = runtime.run("A", ExecutionState::new()).await.unwrap();
//! assert_eq!(out.current_node.as_deref(), Some("topic_T2"));
//! # }
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod handler;
pub mod loader;
pub mod runtime;
pub mod state;
pub mod store;

pub use config::{ConfigError, FlowConfig, Neo4jSettings, StoreConfig};
pub use error::{ExecutionError, FlowError, HandlerError};
pub use graph::{
    CompilationError, CompiledGraph, ExecutionEngine, GraphCompiler, GraphEdge, GraphNode,
    GraphShape, GraphSpec, NodeMetadata, StepEvent, Transition, DEFAULT_MAX_STEPS,
};
pub use handler::{
    Handler, HandlerKey, HandlerRegistry, HandlerResolutionError, HandlerResolver, TopicHandler,
};
pub use loader::{LoadError, StructureLoader};
pub use runtime::FlowRuntime;
pub use state::ExecutionState;
#[cfg(feature = "neo4j")]
pub use store::Neo4jHttpStore;
pub use store::{
    GraphStore, InMemoryGraphStore, InstructionRecord, StoreError, TopicRecord, TopicRow,
    TopicScope,
};
