//! `structure` and `run` commands.

use serde::Serialize;
use serde_json::Value;
use topicflow::{ExecutionState, FlowConfig, FlowRuntime};

use crate::config::Error;

/// One executed node, recorded when `--trace` is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceLine {
    pub step: usize,
    pub node: String,
    pub next: Option<String>,
}

/// Outcome of `run`: final state as JSON plus the optional node trace.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub final_state: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceLine>,
}

/// Parses `--state`; absent means an empty state.
pub fn parse_state(raw: Option<&str>) -> Result<ExecutionState, Error> {
    let Some(raw) = raw else {
        return Ok(ExecutionState::new());
    };
    let value: Value =
        serde_json::from_str(raw).map_err(|e| Error::InvalidState(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::InvalidState("expected a JSON object".into()));
    }
    ExecutionState::from_json(value).map_err(|e| Error::InvalidState(e.to_string()))
}

/// Loads `agent_id`'s structure and returns it as JSON.
pub async fn show_structure(config: &FlowConfig, agent_id: &str) -> Result<Value, Error> {
    let runtime = FlowRuntime::from_config(config).await?;
    let spec = runtime.structure(agent_id).await?;
    Ok(serde_json::to_value(spec)?)
}

/// Runs `agent_id`'s flow from `state` (JSON text); records every step when `trace`.
pub async fn run_agent(
    config: &FlowConfig,
    agent_id: &str,
    state: Option<&str>,
    trace: bool,
) -> Result<RunReport, Error> {
    let initial = parse_state(state)?;
    let runtime = FlowRuntime::from_config(config).await?;

    let mut lines = Vec::new();
    let final_state = runtime
        .run_with(agent_id, initial, |ev| {
            tracing::debug!(step = ev.step, node = ev.node, next = ?ev.next, "step");
            if trace {
                lines.push(TraceLine {
                    step: ev.step,
                    node: ev.node.to_string(),
                    next: ev.next.map(String::from),
                });
            }
        })
        .await?;

    Ok(RunReport {
        final_state: final_state.to_json()?,
        trace: lines,
    })
}
