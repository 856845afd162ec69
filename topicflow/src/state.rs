//! Execution state threaded through every node of a walk.
//!
//! One state type flows state-in, state-out through all handlers. Reserved keys are
//! typed fields; anything else a handler wants to keep goes in a side-channel map
//! reached through [`ExecutionState::get`] / [`ExecutionState::set`].
//! On the wire the state is a single flat JSON object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HandlerError;
use crate::store::{InstructionRecord, TopicScope};

/// Keys held in typed fields. [`ExecutionState::get`] and [`ExecutionState::set`] route
/// them to those fields, so the side-channel map never contains them.
pub const RESERVED_KEYS: &[&str] = &[
    "current_node",
    "agent_id",
    "agent_name",
    "topic_id",
    "topic_label",
    "topic_scope",
    "instructions",
    "intent",
];

/// State for one walk over a compiled graph.
///
/// The engine refreshes `current_node` and the topic metadata fields before each node
/// runs. `intent` is read after a node with conditional edges to pick the next node.
///
/// **Interaction**: Owned by the caller of
/// [`ExecutionEngine::invoke`](crate::graph::ExecutionEngine::invoke); returned with the
/// cumulative effect of every visited node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    #[serde(default)]
    pub current_node: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub topic_label: Option<String>,
    #[serde(default)]
    pub topic_scope: Option<TopicScope>,
    #[serde(default)]
    pub instructions: Vec<InstructionRecord>,
    /// Routing key for conditional edges.
    #[serde(default)]
    pub intent: Option<String>,
    /// Handler-specific keys; never holds a name from [`RESERVED_KEYS`].
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from a JSON object (reserved keys typed, the rest into the side map).
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Sets the routing intent (builder style).
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    /// Value under `key` as JSON. Reserved keys read their typed field.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "current_node" => self.current_node.clone().map(Value::from),
            "agent_id" => self.agent_id.clone().map(Value::from),
            "agent_name" => self.agent_name.clone().map(Value::from),
            "topic_id" => self.topic_id.clone().map(Value::from),
            "topic_label" => self.topic_label.clone().map(Value::from),
            "topic_scope" => self
                .topic_scope
                .as_ref()
                .and_then(|s| serde_json::to_value(s).ok()),
            "instructions" => serde_json::to_value(&self.instructions).ok(),
            "intent" => self.intent.clone().map(Value::from),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Sets `key`; returns the previous value.
    ///
    /// Reserved keys are written to their typed field (`null` clears it), so
    /// `set("intent", "next_node")` drives routing exactly like assigning `intent`.
    /// Fails when a reserved key gets a value of the wrong shape.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, HandlerError> {
        let key = key.into();
        let value = value.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            return Ok(self.extra.insert(key, value));
        }

        let previous = self.get(&key);
        match key.as_str() {
            "current_node" => self.current_node = typed(&key, value)?,
            "agent_id" => self.agent_id = typed(&key, value)?,
            "agent_name" => self.agent_name = typed(&key, value)?,
            "topic_id" => self.topic_id = typed(&key, value)?,
            "topic_label" => self.topic_label = typed(&key, value)?,
            "topic_scope" => self.topic_scope = typed(&key, value)?,
            "instructions" if value.is_null() => self.instructions.clear(),
            "instructions" => self.instructions = typed(&key, value)?,
            "intent" => self.intent = typed(&key, value)?,
            _ => {}
        }
        Ok(previous)
    }

    /// Handler-specific keys (everything except [`RESERVED_KEYS`]).
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn typed<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, HandlerError> {
    serde_json::from_value(value).map_err(|e| HandlerError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
