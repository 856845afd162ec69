use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::record::{InstructionRow, TopicRecord, TopicRow};
use super::{GraphStore, StoreError};

/// Agent entry in a JSON fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureAgent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topics: Vec<TopicRecord>,
}

/// JSON fixture: `{ "agents": [ { "id", "name", "topics": [...] } ] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub agents: Vec<FixtureAgent>,
}

#[derive(Debug, Clone)]
struct AgentEntry {
    name: Option<String>,
    topics: Vec<TopicRecord>,
}

/// In-memory graph store for dev, tests and the CLI.
///
/// Answers the structure query the way the Cypher query would, including the
/// artifacts the loader has to clean up: a topic-less row for agents without topics
/// and an empty instruction entry for topics without instructions. Rows come back in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    agents: HashMap<String, AgentEntry>,
}

impl InMemoryGraphStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an agent with no topics.
    pub fn add_agent(&mut self, id: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.agents.insert(
            id.into(),
            AgentEntry {
                name: Some(name.into()),
                topics: Vec::new(),
            },
        );
        self
    }

    /// Attaches a topic to an agent, creating the agent (unnamed) if needed.
    pub fn add_topic(&mut self, agent_id: impl Into<String>, topic: TopicRecord) -> &mut Self {
        let agent_id = agent_id.into();
        let entry = self.agents.entry(agent_id.clone()).or_insert(AgentEntry {
            name: None,
            topics: Vec::new(),
        });
        let mut topic = topic;
        topic.agent_id = agent_id;
        topic.agent_name = entry.name.clone();
        entry.topics.push(topic);
        self
    }

    /// Builds a store from a parsed fixture.
    pub fn from_fixture(fixture: Fixture) -> Self {
        let mut store = Self::new();
        for agent in fixture.agents {
            store.agents.insert(
                agent.id.clone(),
                AgentEntry {
                    name: agent.name,
                    topics: Vec::new(),
                },
            );
            for topic in agent.topics {
                store.add_topic(agent.id.clone(), topic);
            }
        }
        store
    }

    /// Parses a JSON fixture string.
    pub fn from_fixture_json(json: &str) -> Result<Self, StoreError> {
        let fixture: Fixture =
            serde_json::from_str(json).map_err(|e| StoreError::Fixture(e.to_string()))?;
        Ok(Self::from_fixture(fixture))
    }

    /// Reads and parses a JSON fixture file.
    pub async fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_fixture_json(&json)
    }

    fn row_for(agent_id: &str, name: &Option<String>, topic: &TopicRecord) -> TopicRow {
        let instructions = if topic.instructions.is_empty() {
            vec![InstructionRow::default()]
        } else {
            topic
                .instructions
                .iter()
                .map(|i| InstructionRow {
                    id: Some(i.id.clone()),
                    text: Some(i.text.clone()),
                })
                .collect()
        };
        TopicRow {
            agent_id: agent_id.to_string(),
            agent_name: name.clone(),
            topic_id: Some(topic.id.clone()),
            topic_label: Some(topic.label.clone()),
            topic_scope: topic.scope.clone(),
            classification_description: topic.classification_description.clone(),
            instructions,
        }
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn topic_rows(&self, agent_id: &str) -> Result<Vec<TopicRow>, StoreError> {
        let Some(entry) = self.agents.get(agent_id) else {
            return Ok(Vec::new());
        };
        if entry.topics.is_empty() {
            return Ok(vec![TopicRow {
                agent_id: agent_id.to_string(),
                agent_name: entry.name.clone(),
                instructions: vec![InstructionRow::default()],
                ..Default::default()
            }]);
        }
        Ok(entry
            .topics
            .iter()
            .map(|t| Self::row_for(agent_id, &entry.name, t))
            .collect())
    }
}
