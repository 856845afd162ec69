//! StructureLoader: ordering, chaining and the no-topics failure.

use std::sync::Arc;

use topicflow::{
    GraphEdge, HandlerKey, InMemoryGraphStore, LoadError, StructureLoader, TopicRecord,
};

use crate::common::scenario_store;

#[tokio::test]
async fn loads_two_topic_agent_as_chain() {
    let loader = StructureLoader::new(Arc::new(scenario_store()));
    let spec = loader.load("A").await.expect("agent A loads");

    assert_eq!(spec.node_names(), vec!["topic_T1", "topic_T2"]);
    assert_eq!(spec.edges, vec![GraphEdge::new("topic_T1", "topic_T2")]);
    assert_eq!(spec.entry_node, "topic_T1");
    let second = spec.node("topic_T2").expect("T2 node");
    assert_eq!(second.metadata.topic_label, "Billing");
    assert!(spec.node("T2").is_none());
    for node in &spec.nodes {
        assert_eq!(node.handler, HandlerKey::topic());
        assert_eq!(node.metadata.agent_id, "A");
        assert_eq!(node.metadata.agent_name.as_deref(), Some("Support"));
        assert!(node.metadata.instructions.is_empty());
    }
}

#[tokio::test]
async fn agent_without_topics_is_no_graph_data() {
    let loader = StructureLoader::new(Arc::new(scenario_store()));
    match loader.load("B").await {
        Err(LoadError::NoGraphData { agent_id }) => assert_eq!(agent_id, "B"),
        other => panic!("expected NoGraphData, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_agent_is_no_graph_data() {
    let loader = StructureLoader::new(Arc::new(scenario_store()));
    assert!(matches!(
        loader.load("nobody").await,
        Err(LoadError::NoGraphData { .. })
    ));
}

#[tokio::test]
async fn n_topics_give_n_nodes_and_n_minus_one_edges_in_scope_order() {
    let mut store = InMemoryGraphStore::new();
    store.add_agent("C", "Many");
    for (id, scope) in [("e", 50), ("a", 3), ("c", 20), ("b", 7), ("d", 42)] {
        store.add_topic("C", TopicRecord::new(id, id.to_uppercase(), scope));
    }
    let spec = StructureLoader::new(Arc::new(store))
        .load("C")
        .await
        .unwrap();

    assert_eq!(
        spec.node_names(),
        vec!["topic_a", "topic_b", "topic_c", "topic_d", "topic_e"]
    );
    assert_eq!(spec.edges.len(), 4);
    for (edge, pair) in spec.edges.iter().zip(spec.nodes.windows(2)) {
        assert_eq!(edge.from_node, pair[0].name);
        assert_eq!(edge.to, pair[1].name);
        assert!(edge.condition.is_none());
    }
    assert_eq!(spec.entry_node, "topic_a");
}

#[tokio::test]
async fn tied_scopes_are_ordered_by_topic_id() {
    let mut store = InMemoryGraphStore::new();
    store
        .add_agent("D", "Ties")
        .add_topic("D", TopicRecord::new("zeta", "Z", 1))
        .add_topic("D", TopicRecord::new("alpha", "A", 1))
        .add_topic("D", TopicRecord::new("first", "F", 0));
    let spec = StructureLoader::new(Arc::new(store))
        .load("D")
        .await
        .unwrap();
    assert_eq!(
        spec.node_names(),
        vec!["topic_first", "topic_alpha", "topic_zeta"]
    );
}

#[tokio::test]
async fn instructions_are_carried_in_order() {
    let mut store = InMemoryGraphStore::new();
    store.add_agent("E", "Instr").add_topic(
        "E",
        TopicRecord::new("T1", "Greeting", 1)
            .with_instruction("I1", "Say hello")
            .with_instruction("I2", "Ask for the order number"),
    );
    let spec = StructureLoader::new(Arc::new(store))
        .load("E")
        .await
        .unwrap();
    let texts: Vec<_> = spec.nodes[0]
        .metadata
        .instructions
        .iter()
        .map(|i| i.text.as_str())
        .collect();
    assert_eq!(texts, vec!["Say hello", "Ask for the order number"]);
}

#[tokio::test]
async fn fixture_file_store_feeds_the_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agents.json");
    std::fs::write(
        &path,
        r#"{ "agents": [ { "id": "A", "name": "Support",
            "topics": [
              { "id": "T2", "label": "Billing", "scope": 2 },
              { "id": "T1", "label": "Greeting", "scope": 1,
                "instructions": [ { "id": "I1", "text": "Say hello" } ] } ] } ] }"#,
    )
    .unwrap();

    let store = InMemoryGraphStore::from_fixture_file(&path).await.unwrap();
    let spec = StructureLoader::new(Arc::new(store)).load("A").await.unwrap();

    assert_eq!(spec.node_names(), vec!["topic_T1", "topic_T2"]);
    assert_eq!(spec.nodes[0].metadata.instructions.len(), 1);
    assert_eq!(spec.nodes[1].metadata.agent_name.as_deref(), Some("Support"));
}
