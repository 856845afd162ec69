//! Tests for the `structure` and `run` commands against fixture files.

use std::path::PathBuf;

use serde_json::json;
use topicflow::{ExecutionError, FlowConfig, FlowError, LoadError, StoreConfig};

use crate::config::Error;
use crate::run::{parse_state, run_agent, show_structure, TraceLine};

const FIXTURE: &str = r#"{ "agents": [
  { "id": "A", "name": "Support",
    "topics": [
      { "id": "T1", "label": "Greeting", "scope": 1,
        "instructions": [ { "id": "I1", "text": "Say hello" } ] },
      { "id": "T2", "label": "Billing", "scope": 2 } ] },
  { "id": "B", "name": "Empty", "topics": [] } ] }"#;

fn fixture_config(dir: &tempfile::TempDir) -> FlowConfig {
    let path: PathBuf = dir.path().join("agents.json");
    std::fs::write(&path, FIXTURE).unwrap();
    FlowConfig {
        store: StoreConfig::Memory {
            fixture: Some(path),
        },
        ..FlowConfig::default()
    }
}

/// **Scenario**: `--state` must be a JSON object; absent means empty.
#[test]
fn parse_state_accepts_objects_only() {
    assert_eq!(parse_state(None).unwrap(), topicflow::ExecutionState::new());
    let state = parse_state(Some(r#"{"customer":"Ada"}"#)).unwrap();
    assert_eq!(state.get("customer"), Some(json!("Ada")));
    assert!(matches!(parse_state(Some("[1]")), Err(Error::InvalidState(_))));
    assert!(matches!(parse_state(Some("{oops")), Err(Error::InvalidState(_))));
}

/// **Scenario**: structure prints both topic nodes and the chain edge.
#[tokio::test]
async fn structure_from_fixture() {
    let dir = tempfile::tempdir().unwrap();
    let spec = show_structure(&fixture_config(&dir), "A").await.unwrap();
    assert_eq!(spec["entry_node"], "topic_T1");
    assert_eq!(spec["edges"], json!([{ "from": "topic_T1", "to": "topic_T2", "condition": null }]));
    assert_eq!(spec["nodes"][0]["metadata"]["instructions"][0]["text"], "Say hello");
}

/// **Scenario**: run with --trace reports every node and the final state.
#[tokio::test]
async fn run_with_trace() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_agent(&fixture_config(&dir), "A", Some(r#"{"customer":"Ada"}"#), true)
        .await
        .unwrap();
    assert_eq!(
        report.trace,
        vec![
            TraceLine {
                step: 1,
                node: "topic_T1".into(),
                next: Some("topic_T2".into()),
            },
            TraceLine {
                step: 2,
                node: "topic_T2".into(),
                next: None,
            },
        ]
    );
    assert_eq!(report.final_state["current_node"], "topic_T2");
    assert_eq!(report.final_state["customer"], "Ada");
}

/// **Scenario**: Agent with no topics is NoGraphData; trace stays empty without --trace.
#[tokio::test]
async fn run_empty_agent_fails() {
    let dir = tempfile::tempdir().unwrap();
    match run_agent(&fixture_config(&dir), "B", None, false).await {
        Err(Error::Flow(FlowError::Load(LoadError::NoGraphData { agent_id }))) => {
            assert_eq!(agent_id, "B")
        }
        other => panic!("expected NoGraphData, got {:?}", other),
    }
}

/// **Scenario**: A step budget below the chain length stops the run.
#[tokio::test]
async fn run_respects_max_steps() {
    let dir = tempfile::tempdir().unwrap();
    let config = FlowConfig {
        max_steps: 1,
        ..fixture_config(&dir)
    };
    assert!(matches!(
        run_agent(&config, "A", None, false).await,
        Err(Error::Flow(FlowError::Execution(
            ExecutionError::StepLimitExceeded { limit: 1, .. }
        )))
    ));
}
