//! GraphCompiler: dangling edges, resolution-free validation, idempotence.

use std::sync::Arc;

use topicflow::{
    CompilationError, GraphCompiler, GraphEdge, HandlerRegistry, StructureLoader, Transition,
};

use crate::common::{scenario_store, CountingResolver};

#[tokio::test]
async fn dangling_edge_fails_before_any_resolution() {
    let mut spec = StructureLoader::new(Arc::new(scenario_store()))
        .load("A")
        .await
        .unwrap();
    spec.edges.push(GraphEdge::new("topic_T2", "topic_missing"));

    let resolver = Arc::new(CountingResolver::new(HandlerRegistry::with_builtins()));
    let compiler = GraphCompiler::new(resolver.clone());

    match compiler.compile(&spec) {
        Err(CompilationError::DanglingEdge {
            from, to, missing, ..
        }) => {
            assert_eq!(from, "topic_T2");
            assert_eq!(to, "topic_missing");
            assert_eq!(missing, "topic_missing");
        }
        other => panic!("expected DanglingEdge, got {:?}", other.err()),
    }
    assert_eq!(resolver.calls(), 0, "no handler may be resolved on a bad spec");
}

#[tokio::test]
async fn dangling_source_is_reported() {
    let mut spec = StructureLoader::new(Arc::new(scenario_store()))
        .load("A")
        .await
        .unwrap();
    spec.edges
        .push(GraphEdge::conditional("ghost", "topic_T1", "next_node"));

    let resolver = Arc::new(CountingResolver::new(HandlerRegistry::with_builtins()));
    let err = GraphCompiler::new(resolver.clone())
        .compile(&spec)
        .err()
        .expect("dangling source");
    assert_eq!(
        err,
        CompilationError::DanglingEdge {
            from: "ghost".into(),
            to: "topic_T1".into(),
            condition: Some("next_node".into()),
            missing: "ghost".into(),
        }
    );
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn compiling_twice_yields_equal_shapes() {
    let spec = StructureLoader::new(Arc::new(scenario_store()))
        .load("A")
        .await
        .unwrap();
    let resolver = Arc::new(CountingResolver::new(HandlerRegistry::with_builtins()));
    let compiler = GraphCompiler::new(resolver.clone());

    let first = compiler.compile(&spec).unwrap();
    let second = compiler.compile(&spec).unwrap();

    assert_eq!(first.shape(), second.shape());
    assert_eq!(first.len(), 2);
    assert!(!first.is_empty());
    assert!(first.contains_node("topic_T1") && first.contains_node("topic_T2"));
    assert!(!first.contains_node("T1"));
    assert_eq!(first.entry_node(), "topic_T1");
    assert_eq!(
        first.transition("topic_T1"),
        Some(&Transition::Direct("topic_T2".into()))
    );
    assert!(first.transition("topic_T2").is_none());
    assert_eq!(resolver.calls(), 4, "one resolution per node per compile");
}
