//! Handler, execution and pipeline error types.
//!
//! Loader, store, compiler and config errors live next to their modules
//! ([`LoadError`], [`StoreError`], [`CompilationError`], [`ConfigError`]);
//! [`FlowError`] aggregates them for the load → compile → invoke pipeline.

use thiserror::Error;

use crate::config::ConfigError;
use crate::graph::CompilationError;
use crate::loader::LoadError;
use crate::store::StoreError;

/// Error returned by a node handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("handler failed: {0}")]
    Failed(String),

    /// A reserved state key was given a value its typed field cannot hold.
    #[error("invalid value for state key {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Error raised while walking a compiled graph. The walk aborts; no partial state is
/// returned.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A node's handler returned an error.
    #[error("node {node} failed: {source}")]
    Handler {
        node: String,
        #[source]
        source: HandlerError,
    },

    /// A node with conditional edges left an intent that matches none of them.
    #[error("no route from node {node} for intent {intent:?} (conditions: {conditions:?})")]
    Routing {
        node: String,
        intent: Option<String>,
        conditions: Vec<String>,
    },

    /// The walk ran more node steps than the engine allows.
    #[error("step limit of {limit} exceeded before running node {node}")]
    StepLimitExceeded { limit: usize, node: String },

    /// The walk reached a node name that is not part of the graph.
    #[error("node not found in compiled graph: {0}")]
    MissingNode(String),
}

/// Error from the full load → compile → invoke pipeline.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Compile(#[from] CompilationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
