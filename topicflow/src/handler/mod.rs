//! Node handlers and the static registry that resolves them.
//!
//! A handler takes the execution state and returns it, possibly modified. Handlers are
//! registered under a [`HandlerKey`] (module + function name) at startup; graph nodes
//! carry the key and the compiler resolves it by lookup.

mod registry;
mod topic;

use serde::{Deserialize, Serialize};

use crate::error::HandlerError;
use crate::state::ExecutionState;

pub use registry::{HandlerRegistry, HandlerResolutionError, HandlerResolver};
pub use topic::TopicHandler;

/// Module name of the built-in topic handler.
pub const TOPIC_HANDLER_MODULE: &str = "agent_modules";
/// Function name of the built-in topic handler.
pub const TOPIC_HANDLER_FUNCTION: &str = "handle_topic";

/// One step of node behavior: state in, state out.
///
/// Implemented for plain closures, so tests and callers can register
/// `|state| Ok(state)` directly.
pub trait Handler: Send + Sync {
    fn call(&self, state: ExecutionState) -> Result<ExecutionState, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(ExecutionState) -> Result<ExecutionState, HandlerError> + Send + Sync,
{
    fn call(&self, state: ExecutionState) -> Result<ExecutionState, HandlerError> {
        self(state)
    }
}

/// Registry key for a handler. Serialized flat as `module` / `function`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandlerKey {
    pub module: String,
    pub function: String,
}

impl HandlerKey {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
        }
    }

    /// Key of the built-in topic handler shared by every loaded node.
    pub fn topic() -> Self {
        Self::new(TOPIC_HANDLER_MODULE, TOPIC_HANDLER_FUNCTION)
    }
}

impl std::fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}", self.module, self.function)
    }
}
