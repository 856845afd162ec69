//! Wrapper that stamps a node's identity onto the state before its handler runs.

use std::sync::Arc;

use crate::error::HandlerError;
use crate::handler::Handler;
use crate::state::ExecutionState;

use super::spec::NodeMetadata;

/// Handler wrapper installed by the compiler around every node's raw handler.
///
/// Overwrites `current_node` and the metadata fields, then delegates. Each handler
/// therefore sees its own node's identity regardless of what earlier nodes wrote.
pub struct MetadataShim {
    node_name: String,
    metadata: NodeMetadata,
    inner: Arc<dyn Handler>,
}

impl MetadataShim {
    pub fn new(node_name: impl Into<String>, metadata: NodeMetadata, inner: Arc<dyn Handler>) -> Self {
        Self {
            node_name: node_name.into(),
            metadata,
            inner,
        }
    }
}

impl Handler for MetadataShim {
    fn call(&self, mut state: ExecutionState) -> Result<ExecutionState, HandlerError> {
        self.metadata.apply_to(&self.node_name, &mut state);
        self.inner.call(state)
    }
}
