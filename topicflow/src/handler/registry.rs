use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::{Handler, HandlerKey, TopicHandler};

/// Failure to resolve a handler key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerResolutionError {
    /// No handler is registered under the module.
    #[error("handler module not found: {module} (resolving {module}::{function})")]
    UnknownModule { module: String, function: String },

    /// The module is known but has no such function.
    #[error("handler function not found: {module}::{function}")]
    UnknownFunction { module: String, function: String },
}

/// Resolves (module, function) names to handlers.
///
/// **Interaction**: Used by [`GraphCompiler`](crate::graph::GraphCompiler). Implemented by
/// [`HandlerRegistry`]; tests implement it to observe resolution calls.
pub trait HandlerResolver: Send + Sync {
    fn resolve(&self, module: &str, function: &str) -> Result<Arc<dyn Handler>, HandlerResolutionError>;
}

/// Static handler registry, filled once at startup.
///
/// Handlers are grouped by module so a miss can say whether the module or only the
/// function is unknown. Resolution is a lookup; nothing is loaded at request time.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    modules: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in handlers (the topic handler).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(HandlerKey::topic(), Arc::new(TopicHandler));
        registry
    }

    /// Registers a handler; replaces any handler under the same key.
    pub fn register(&mut self, key: HandlerKey, handler: Arc<dyn Handler>) -> &mut Self {
        self.modules
            .entry(key.module)
            .or_default()
            .insert(key.function, handler);
        self
    }

    pub fn contains(&self, key: &HandlerKey) -> bool {
        self.modules
            .get(&key.module)
            .is_some_and(|m| m.contains_key(&key.function))
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<HandlerKey> {
        let mut keys: Vec<_> = self
            .modules
            .iter()
            .flat_map(|(module, fns)| fns.keys().map(move |f| HandlerKey::new(module, f)))
            .collect();
        keys.sort();
        keys
    }
}

impl HandlerResolver for HandlerRegistry {
    fn resolve(&self, module: &str, function: &str) -> Result<Arc<dyn Handler>, HandlerResolutionError> {
        let fns = self
            .modules
            .get(module)
            .ok_or_else(|| HandlerResolutionError::UnknownModule {
                module: module.to_string(),
                function: function.to_string(),
            })?;
        fns.get(function)
            .cloned()
            .ok_or_else(|| HandlerResolutionError::UnknownFunction {
                module: module.to_string(),
                function: function.to_string(),
            })
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
