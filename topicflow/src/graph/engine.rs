//! Execution engine: synchronous walk over a compiled graph.

use crate::error::ExecutionError;
use crate::state::ExecutionState;

use super::compiled::CompiledGraph;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
};

/// Default maximum number of node executions per walk.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Emitted after each node runs, before moving on.
#[derive(Debug)]
pub struct StepEvent<'a> {
    /// 1-based step number.
    pub step: usize,
    pub node: &'a str,
    /// Successor chosen by the routing table; `None` when the walk ends here.
    pub next: Option<&'a str>,
    pub state: &'a ExecutionState,
}

/// Walks a [`CompiledGraph`] from its entry node until a node without a transition.
///
/// Each step runs the node's wrapped handler, then follows its transition: direct edges
/// always, routed edges by `state.intent`. The step budget bounds cycles through
/// conditional edges. Holds no mutable state; `Copy` so callers can move it into
/// blocking tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionEngine {
    max_steps: usize,
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionEngine {
    /// Engine with [`DEFAULT_MAX_STEPS`].
    pub fn new() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Engine allowing at most `max_steps` node executions per walk.
    pub fn with_max_steps(max_steps: usize) -> Self {
        Self { max_steps }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Runs the graph with the given state and returns the final state.
    pub fn invoke(
        &self,
        graph: &CompiledGraph,
        state: ExecutionState,
    ) -> Result<ExecutionState, ExecutionError> {
        self.invoke_with(graph, state, |_| {})
    }

    /// Like [`invoke`](Self::invoke), calling `on_step` after every node.
    pub fn invoke_with<F>(
        &self,
        graph: &CompiledGraph,
        state: ExecutionState,
        on_step: F,
    ) -> Result<ExecutionState, ExecutionError>
    where
        F: FnMut(&StepEvent<'_>),
    {
        log_graph_start(graph.entry_node());
        self.run_loop(graph, state, on_step).map_err(|e| {
            log_graph_error(&e);
            e
        })
    }

    fn run_loop<F>(
        &self,
        graph: &CompiledGraph,
        mut state: ExecutionState,
        mut on_step: F,
    ) -> Result<ExecutionState, ExecutionError>
    where
        F: FnMut(&StepEvent<'_>),
    {
        let mut current = graph.entry_node().to_string();
        let mut step = 0;
        loop {
            if step >= self.max_steps {
                return Err(ExecutionError::StepLimitExceeded {
                    limit: self.max_steps,
                    node: current,
                });
            }
            step += 1;

            let handler = graph.handler(&current)?;
            log_node_start(&current, step);
            state = handler
                .call(state)
                .map_err(|source| ExecutionError::Handler {
                    node: current.clone(),
                    source,
                })?;

            let next = graph.next_node(&current, &state)?;
            log_node_complete(&current, next.as_deref());
            on_step(&StepEvent {
                step,
                node: &current,
                next: next.as_deref(),
                state: &state,
            });

            match next {
                Some(next) => current = next,
                None => {
                    log_graph_complete(&current, step);
                    return Ok(state);
                }
            }
        }
    }
}
