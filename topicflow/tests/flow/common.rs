//! Shared fixtures for flow integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use topicflow::{
    ExecutionState, Handler, HandlerError, HandlerKey, HandlerRegistry, HandlerResolutionError,
    HandlerResolver, InMemoryGraphStore, TopicRecord,
};

/// Store with agent `A` (T1 scope 1, T2 scope 2, no instructions) and agent `B` (no topics).
pub fn scenario_store() -> InMemoryGraphStore {
    let mut store = InMemoryGraphStore::new();
    store
        .add_agent("A", "Support")
        .add_topic("A", TopicRecord::new("T1", "Greeting", 1))
        .add_topic("A", TopicRecord::new("T2", "Billing", 2));
    store.add_agent("B", "Empty");
    store
}

/// Resolver that counts resolution calls and delegates to the built-in registry.
pub struct CountingResolver {
    pub calls: AtomicUsize,
    registry: HandlerRegistry,
}

impl CountingResolver {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            registry,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HandlerResolver for CountingResolver {
    fn resolve(
        &self,
        module: &str,
        function: &str,
    ) -> Result<Arc<dyn Handler>, HandlerResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.registry.resolve(module, function)
    }
}

/// Handler that records the `current_node` it sees, then sets a fixed intent.
pub struct RecordingHandler {
    pub seen: Arc<Mutex<Vec<String>>>,
    pub intent: Option<String>,
}

impl Handler for RecordingHandler {
    fn call(&self, state: ExecutionState) -> Result<ExecutionState, HandlerError> {
        self.seen
            .lock()
            .unwrap()
            .push(state.current_node.clone().unwrap_or_default());
        Ok(match &self.intent {
            Some(i) => state.with_intent(i.clone()),
            None => state,
        })
    }
}

/// Registry whose `test::record` handler writes into `seen` and sets `intent`.
pub fn recording_registry(seen: Arc<Mutex<Vec<String>>>, intent: Option<&str>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::with_builtins();
    registry.register(
        HandlerKey::new("test", "record"),
        Arc::new(RecordingHandler {
            seen,
            intent: intent.map(String::from),
        }),
    );
    registry
}
