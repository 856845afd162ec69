//! Compile-and-run pipeline: load → compile → invoke for one agent per request.
//!
//! [`FlowRuntime`] is what outer surfaces (HTTP server, CLI) hold. Nothing is cached
//! across calls; every `structure` / `compile` / `run` reads the store fresh.

use std::sync::Arc;

use crate::config::{FlowConfig, StoreConfig};
use crate::error::FlowError;
use crate::graph::{CompiledGraph, ExecutionEngine, GraphCompiler, GraphSpec, StepEvent};
use crate::handler::{HandlerRegistry, HandlerResolver};
use crate::loader::StructureLoader;
use crate::state::ExecutionState;
use crate::store::{GraphStore, InMemoryGraphStore};

/// Loader, compiler and engine wired together.
#[derive(Clone)]
pub struct FlowRuntime {
    loader: StructureLoader,
    compiler: GraphCompiler,
    engine: ExecutionEngine,
}

impl FlowRuntime {
    /// Runtime over `store` resolving handlers through `resolver`, with the default engine.
    pub fn new(store: Arc<dyn GraphStore>, resolver: Arc<dyn HandlerResolver>) -> Self {
        Self {
            loader: StructureLoader::new(store),
            compiler: GraphCompiler::new(resolver),
            engine: ExecutionEngine::new(),
        }
    }

    /// Replaces the engine (e.g. a different step budget).
    pub fn with_engine(mut self, engine: ExecutionEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Builds the store named by `config`, the built-in handler registry and an engine
    /// with the configured step budget.
    pub async fn from_config(config: &FlowConfig) -> Result<Self, FlowError> {
        let store = build_store(&config.store).await?;
        Ok(Self::new(store, Arc::new(HandlerRegistry::with_builtins()))
            .with_engine(ExecutionEngine::with_max_steps(config.max_steps)))
    }

    pub fn engine(&self) -> &ExecutionEngine {
        &self.engine
    }

    /// Serializable structure of `agent_id`'s flow.
    pub async fn structure(&self, agent_id: &str) -> Result<GraphSpec, FlowError> {
        Ok(self.loader.load(agent_id).await?)
    }

    /// Loads and compiles `agent_id`'s flow.
    pub async fn compile(&self, agent_id: &str) -> Result<CompiledGraph, FlowError> {
        let spec = self.loader.load(agent_id).await?;
        self.compiler.compile(&spec).map_err(|e| {
            tracing::error!(agent_id = agent_id, error = %e, "graph compilation failed");
            FlowError::from(e)
        })
    }

    /// Loads, compiles and runs `agent_id`'s flow from `state`; returns the final state.
    pub async fn run(&self, agent_id: &str, state: ExecutionState) -> Result<ExecutionState, FlowError> {
        self.run_with(agent_id, state, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_step` after every node.
    pub async fn run_with<F>(
        &self,
        agent_id: &str,
        state: ExecutionState,
        on_step: F,
    ) -> Result<ExecutionState, FlowError>
    where
        F: FnMut(&StepEvent<'_>),
    {
        let graph = self.compile(agent_id).await?;
        tracing::info!(agent_id = agent_id, entry = graph.entry_node(), "running agent graph");
        self.engine
            .invoke_with(&graph, state, on_step)
            .map_err(|e| {
                tracing::warn!(agent_id = agent_id, error = %e, "agent graph run failed");
                FlowError::from(e)
            })
    }
}

/// Creates the graph store described by `config`.
pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn GraphStore>, FlowError> {
    match config {
        StoreConfig::Memory { fixture: None } => Ok(Arc::new(InMemoryGraphStore::new())),
        StoreConfig::Memory {
            fixture: Some(path),
        } => {
            let store = InMemoryGraphStore::from_fixture_file(path).await?;
            tracing::info!(fixture = %path.display(), "loaded in-memory graph store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "neo4j")]
        StoreConfig::Neo4j(settings) => {
            let store = crate::store::Neo4jHttpStore::new(settings.clone())?;
            tracing::info!(uri = %settings.uri, database = %settings.database, "using Neo4j graph store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "neo4j"))]
        StoreConfig::Neo4j(_) => Err(crate::config::ConfigError::StoreUnavailable("neo4j".into()).into()),
    }
}
