//! Built-in topic handler shared by every node the loader emits.

use crate::error::HandlerError;
use crate::state::ExecutionState;

use super::Handler;

/// Intent the topic handler leaves behind after processing a topic.
pub const NEXT_NODE_INTENT: &str = "next_node";

/// Logs the node's topic and instructions, records a `message` and sets
/// `intent = "next_node"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn call(&self, mut state: ExecutionState) -> Result<ExecutionState, HandlerError> {
        let label = state.topic_label.clone().unwrap_or_default();
        tracing::info!(
            agent_id = ?state.agent_id,
            agent_name = ?state.agent_name,
            node_id = ?state.current_node,
            topic_id = ?state.topic_id,
            topic = %label,
            instructions = state.instructions.len(),
            "processing topic"
        );
        for instruction in &state.instructions {
            tracing::debug!(instruction_id = %instruction.id, text = %instruction.text, "instruction");
        }
        state.set("message", format!("Processed topic: {}", label))?;
        state.intent = Some(NEXT_NODE_INTENT.to_string());
        Ok(state)
    }
}
