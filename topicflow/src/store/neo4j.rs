//! Neo4j graph store over the HTTP transactional endpoint.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::cypher::{commit_url, decode_response, structure_request};
use super::record::TopicRow;
use super::{GraphStore, StoreError};
use crate::config::Neo4jSettings;

/// Graph store backed by Neo4j's `POST /db/{database}/tx/commit` endpoint.
///
/// Holds one `reqwest::Client`; the store is created once at startup and shared by
/// every request through the loader.
pub struct Neo4jHttpStore {
    client: reqwest::Client,
    commit_url: String,
    settings: Neo4jSettings,
}

impl Neo4jHttpStore {
    pub fn new(settings: Neo4jSettings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Ok(Self {
            client,
            commit_url: commit_url(&settings.uri, &settings.database),
            settings,
        })
    }

    pub fn commit_url(&self) -> &str {
        &self.commit_url
    }
}

/// Maps a non-success HTTP status to [`StoreError::Request`].
fn check_status(url: &str, status: StatusCode) -> Result<(), StoreError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(StoreError::Request(format!("{} returned {}", url, status)))
    }
}

#[async_trait]
impl GraphStore for Neo4jHttpStore {
    async fn topic_rows(&self, agent_id: &str) -> Result<Vec<TopicRow>, StoreError> {
        tracing::debug!(agent_id = agent_id, url = %self.commit_url, "querying agent structure");
        let res = self
            .client
            .post(&self.commit_url)
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .json(&structure_request(agent_id))
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        check_status(&self.commit_url, res.status())?;
        let body: Value = res
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        decode_response(body)
    }
}
