//! Records read from the graph store: topics, instructions and raw query rows.
//!
//! [`TopicRow`] mirrors one row of the structure query (agent joined with an optional
//! topic and the collected instructions). [`TopicRecord`] is the cleaned-up snapshot the
//! loader works with after filtering empty rows.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Orderable discriminator placing a topic within its agent's flow.
///
/// Stored either as a number (integer or float) or as text. Ordering follows Cypher
/// `ORDER BY`: all text scopes sort before all numeric scopes; integers and floats
/// compare numerically with each other; within text, natural order applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TopicScope {
    Number(i64),
    Float(f64),
    Text(String),
}

impl TopicScope {
    fn kind_rank(&self) -> u8 {
        match self {
            TopicScope::Text(_) => 0,
            TopicScope::Number(_) | TopicScope::Float(_) => 1,
        }
    }
}

impl Ord for TopicScope {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (TopicScope::Number(a), TopicScope::Number(b)) => a.cmp(b),
            (TopicScope::Float(a), TopicScope::Float(b)) => a.total_cmp(b),
            (TopicScope::Number(a), TopicScope::Float(b)) => (*a as f64).total_cmp(b),
            (TopicScope::Float(a), TopicScope::Number(b)) => a.total_cmp(&(*b as f64)),
            (TopicScope::Text(a), TopicScope::Text(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for TopicScope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TopicScope {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TopicScope {}

impl fmt::Display for TopicScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicScope::Number(n) => write!(f, "{}", n),
            TopicScope::Float(x) => write!(f, "{}", x),
            TopicScope::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TopicScope {
    fn from(n: i64) -> Self {
        TopicScope::Number(n)
    }
}

impl From<i32> for TopicScope {
    fn from(n: i32) -> Self {
        TopicScope::Number(i64::from(n))
    }
}

impl From<f64> for TopicScope {
    fn from(x: f64) -> Self {
        TopicScope::Float(x)
    }
}

impl From<&str> for TopicScope {
    fn from(s: &str) -> Self {
        TopicScope::Text(s.to_string())
    }
}

impl From<String> for TopicScope {
    fn from(s: String) -> Self {
        TopicScope::Text(s)
    }
}

/// One instruction attached to a topic; handed to the topic's handler as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRecord {
    pub id: String,
    pub text: String,
}

impl InstructionRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Source-of-truth unit for one graph node. Read-only snapshot; never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub scope: Option<TopicScope>,
    #[serde(default)]
    pub classification_description: Option<String>,
    /// Owning agent; filled in by the store when the record is read.
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub instructions: Vec<InstructionRecord>,
}

impl TopicRecord {
    /// Creates a topic with no instructions and no owning agent yet.
    pub fn new(id: impl Into<String>, label: impl Into<String>, scope: impl Into<TopicScope>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            scope: Some(scope.into()),
            classification_description: None,
            agent_id: String::new(),
            agent_name: None,
            instructions: Vec::new(),
        }
    }

    /// Appends an instruction (builder style).
    pub fn with_instruction(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.instructions.push(InstructionRecord::new(id, text));
        self
    }

    pub fn with_classification(mut self, description: impl Into<String>) -> Self {
        self.classification_description = Some(description.into());
        self
    }
}

/// Instruction entry as collected by the structure query. Both fields are null when the
/// topic has no instructions (the optional match collects a single empty map).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// One row of the structure query.
///
/// `topic_id` is `None` when the agent exists but has no topics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRow {
    pub agent_id: String,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub topic_label: Option<String>,
    #[serde(default)]
    pub topic_scope: Option<TopicScope>,
    #[serde(default)]
    pub classification_description: Option<String>,
    #[serde(default)]
    pub instructions: Vec<InstructionRow>,
}

impl TopicRow {
    /// Converts the row into a topic record, dropping empty instruction entries.
    ///
    /// Returns `None` for rows without a topic.
    pub fn into_topic(self) -> Option<TopicRecord> {
        let id = self.topic_id?;
        let instructions = self
            .instructions
            .into_iter()
            .filter_map(|i| {
                let id = i.id?;
                Some(InstructionRecord {
                    id,
                    text: i.text.unwrap_or_default(),
                })
            })
            .collect();
        Some(TopicRecord {
            id,
            label: self.topic_label.unwrap_or_default(),
            scope: self.topic_scope,
            classification_description: self.classification_description,
            agent_id: self.agent_id,
            agent_name: self.agent_name,
            instructions,
        })
    }
}
