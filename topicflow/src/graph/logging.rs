//! Logging utilities for graph execution.
//!
//! Structured tracing events for walk start/completion/failure and per-node steps.

use crate::error::ExecutionError;

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id = node_id, step = step, "Starting node execution");
}

/// Log node execution completion and the chosen successor (`None` = terminal).
pub fn log_node_complete(node_id: &str, next: Option<&str>) {
    tracing::debug!(node_id = node_id, next = ?next, "Node execution complete");
}

/// Log graph execution start.
pub fn log_graph_start(entry: &str) {
    tracing::info!(entry = entry, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(last_node: &str, steps: usize) {
    tracing::info!(last_node = last_node, steps = steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &ExecutionError) {
    tracing::error!(%error, "Graph execution error");
}
