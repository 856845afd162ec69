//! ExecutionEngine over loaded and hand-built graphs.

use std::sync::{Arc, Mutex};

use serde_json::json;
use topicflow::{
    ExecutionEngine, ExecutionError, ExecutionState, FlowError, FlowRuntime, GraphCompiler,
    GraphEdge, GraphNode, GraphSpec, HandlerKey, HandlerRegistry, NodeMetadata, StructureLoader,
};

use crate::common::{recording_registry, scenario_store};

fn node(name: &str, handler: HandlerKey) -> GraphNode {
    GraphNode {
        name: name.to_string(),
        handler,
        metadata: NodeMetadata {
            agent_id: "A".into(),
            agent_name: Some("Support".into()),
            topic_id: name.to_string(),
            topic_label: name.to_string(),
            topic_scope: None,
            instructions: vec![],
        },
    }
}

#[tokio::test]
async fn two_topic_agent_runs_to_last_node() {
    let spec = StructureLoader::new(Arc::new(scenario_store()))
        .load("A")
        .await
        .unwrap();
    let graph = GraphCompiler::new(Arc::new(HandlerRegistry::with_builtins()))
        .compile(&spec)
        .unwrap();

    let mut visited = Vec::new();
    let out = ExecutionEngine::new()
        .invoke_with(&graph, ExecutionState::from_json(json!({})).unwrap(), |ev| {
            visited.push(ev.node.to_string())
        })
        .unwrap();

    assert_eq!(visited, vec!["topic_T1", "topic_T2"]);
    assert_eq!(out.current_node.as_deref(), Some("topic_T2"));
    assert_eq!(out.topic_id.as_deref(), Some("T2"));
    assert_eq!(out.topic_label.as_deref(), Some("Billing"));
    assert_eq!(out.get("message"), Some(json!("Processed topic: Billing")));
    assert_eq!(out.intent.as_deref(), Some("next_node"));
}

#[tokio::test]
async fn linear_chain_visits_nodes_in_chain_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let registry = recording_registry(seen.clone(), None);
    let names = ["n1", "n2", "n3", "n4"];
    let spec = GraphSpec {
        entry_node: "n1".into(),
        nodes: names
            .iter()
            .map(|n| node(n, HandlerKey::new("test", "record")))
            .collect(),
        edges: names
            .windows(2)
            .map(|w| GraphEdge::new(w[0], w[1]))
            .collect(),
    };
    let graph = GraphCompiler::new(Arc::new(registry)).compile(&spec).unwrap();

    let out = ExecutionEngine::new()
        .invoke(&graph, ExecutionState::new())
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["n1", "n2", "n3", "n4"]);
    assert_eq!(out.current_node.as_deref(), Some("n4"));
}

fn branching_spec() -> GraphSpec {
    GraphSpec {
        entry_node: "start".into(),
        nodes: vec![
            node("start", HandlerKey::new("test", "record")),
            node("x", HandlerKey::topic()),
            node("y", HandlerKey::topic()),
        ],
        edges: vec![
            GraphEdge::conditional("start", "x", "next_node"),
            GraphEdge::conditional("start", "y", "escalate"),
        ],
    }
}

#[tokio::test]
async fn matching_intent_follows_conditional_edge() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let graph = GraphCompiler::new(Arc::new(recording_registry(seen.clone(), Some("next_node"))))
        .compile(&branching_spec())
        .unwrap();

    let out = ExecutionEngine::new()
        .invoke(&graph, ExecutionState::new())
        .unwrap();

    assert_eq!(out.current_node.as_deref(), Some("x"));
    assert_eq!(*seen.lock().unwrap(), vec!["start"]);
}

#[tokio::test]
async fn unmatched_intent_is_routing_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let graph = GraphCompiler::new(Arc::new(recording_registry(seen, Some("unknown"))))
        .compile(&branching_spec())
        .unwrap();

    match ExecutionEngine::new().invoke(&graph, ExecutionState::new()) {
        Err(ExecutionError::Routing {
            node,
            intent,
            conditions,
        }) => {
            assert_eq!(node, "start");
            assert_eq!(intent.as_deref(), Some("unknown"));
            assert_eq!(conditions, vec!["escalate".to_string(), "next_node".to_string()]);
        }
        other => panic!("expected Routing error, got {:?}", other),
    }
}

#[tokio::test]
async fn caller_state_survives_the_walk() {
    let runtime = FlowRuntime::new(
        Arc::new(scenario_store()),
        Arc::new(HandlerRegistry::with_builtins()),
    );
    let initial = ExecutionState::from_json(json!({
        "customer": "Ada",
        "current_node": "stale",
        "topic_label": "stale"
    }))
    .unwrap();

    let out = runtime.run("A", initial).await.unwrap();

    assert_eq!(out.get("customer"), Some(json!("Ada")));
    assert_eq!(out.current_node.as_deref(), Some("topic_T2"));
    assert_eq!(out.topic_label.as_deref(), Some("Billing"));
}

#[tokio::test]
async fn step_budget_applies_through_runtime() {
    let runtime = FlowRuntime::new(
        Arc::new(scenario_store()),
        Arc::new(HandlerRegistry::with_builtins()),
    )
    .with_engine(ExecutionEngine::with_max_steps(1));

    match runtime.run("A", ExecutionState::new()).await {
        Err(FlowError::Execution(ExecutionError::StepLimitExceeded { limit, node })) => {
            assert_eq!(limit, 1);
            assert_eq!(node, "topic_T2");
        }
        other => panic!("expected StepLimitExceeded, got {:?}", other),
    }
}
