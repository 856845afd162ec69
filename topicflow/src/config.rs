//! Runtime configuration: which graph store to read, step budget, listen address.
//!
//! Filled from the environment (callers load `.env` first). [`FlowConfig::from_lookup`]
//! takes any key → value function so configuration can be built without touching the
//! process environment.

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::DEFAULT_MAX_STEPS;

/// URI schemes accepted for `NEO4J_URI` (the HTTP transactional endpoint).
pub const NEO4J_ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Default Neo4j database name.
pub const DEFAULT_NEO4J_DATABASE: &str = "neo4j";

/// Default server listen address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8123";

/// Error building configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("NEO4J_URI must use the http or https scheme: {0}")]
    InvalidNeo4jScheme(String),

    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("unknown GRAPH_STORE {0:?} (expected \"memory\" or \"neo4j\")")]
    UnknownStore(String),

    /// The configured store needs a cargo feature this build lacks.
    #[error("graph store {0:?} requires the {0:?} feature")]
    StoreUnavailable(String),
}

/// Connection settings for the Neo4j HTTP endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Neo4jSettings {
    /// Base URI, e.g. `http://localhost:7474`.
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// Which graph store backs the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// In-memory store, optionally seeded from a JSON fixture file.
    Memory { fixture: Option<PathBuf> },
    Neo4j(Neo4jSettings),
}

/// Configuration for building a [`FlowRuntime`](crate::runtime::FlowRuntime) and server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    pub store: StoreConfig,
    /// Maximum node executions per walk.
    pub max_steps: usize,
    /// Server listen address.
    pub listen: String,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::Memory { fixture: None },
            max_steps: DEFAULT_MAX_STEPS,
            listen: DEFAULT_LISTEN.to_string(),
        }
    }
}

impl FlowConfig {
    /// Reads `GRAPH_STORE`, `TOPICFLOW_FIXTURE`, `NEO4J_*`, `MAX_STEPS` and `LISTEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match get("GRAPH_STORE").as_deref().map(str::to_ascii_lowercase) {
            None => StoreConfig::Memory {
                fixture: get("TOPICFLOW_FIXTURE").map(PathBuf::from),
            },
            Some(kind) if kind == "memory" => StoreConfig::Memory {
                fixture: get("TOPICFLOW_FIXTURE").map(PathBuf::from),
            },
            Some(kind) if kind == "neo4j" => StoreConfig::Neo4j(Neo4jSettings {
                uri: validate_neo4j_uri(get("NEO4J_URI").ok_or(ConfigError::MissingVar("NEO4J_URI"))?)?,
                username: get("NEO4J_USERNAME").ok_or(ConfigError::MissingVar("NEO4J_USERNAME"))?,
                password: get("NEO4J_PASSWORD").ok_or(ConfigError::MissingVar("NEO4J_PASSWORD"))?,
                database: get("NEO4J_DATABASE").unwrap_or_else(|| DEFAULT_NEO4J_DATABASE.to_string()),
            }),
            Some(other) => return Err(ConfigError::UnknownStore(other)),
        };

        let max_steps = match get("MAX_STEPS") {
            None => DEFAULT_MAX_STEPS,
            Some(raw) => parse_positive("MAX_STEPS", &raw)?,
        };

        Ok(Self {
            store,
            max_steps,
            listen: get("LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
        })
    }
}

fn validate_neo4j_uri(uri: String) -> Result<String, ConfigError> {
    let scheme = uri.split_once("://").map(|(s, _)| s.to_ascii_lowercase());
    match scheme {
        Some(s) if NEO4J_ALLOWED_SCHEMES.contains(&s.as_str()) => Ok(uri),
        _ => Err(ConfigError::InvalidNeo4jScheme(uri)),
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        }),
    }
}
