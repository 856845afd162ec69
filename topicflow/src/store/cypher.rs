//! Structure query text and decoding of Neo4j HTTP transactional responses.
//!
//! Kept free of any HTTP client so decoding is usable (and tested) without the
//! `neo4j` feature.

use serde_json::{json, Map, Value};

use super::record::TopicRow;
use super::StoreError;

/// Fetches one agent's topics with their collected instructions.
///
/// Column aliases match the field names of [`TopicRow`].
pub const STRUCTURE_QUERY: &str = "\
MATCH (a:Agent {id: $agent_id})
OPTIONAL MATCH (a)-[:HAS_TOPIC]->(t:Topic)
OPTIONAL MATCH (t)-[:HAS_INSTRUCTION]->(i:TopicInstruction)
RETURN a.id AS agent_id,
       a.name AS agent_name,
       t.id AS topic_id,
       t.label AS topic_label,
       t.scope AS topic_scope,
       t.classification_description AS classification_description,
       collect({id: i.id, text: i.instruction_text}) AS instructions
ORDER BY t.scope, t.id";

/// Transactional commit endpoint for `database` under the base `uri`.
pub fn commit_url(uri: &str, database: &str) -> String {
    format!("{}/db/{}/tx/commit", uri.trim_end_matches('/'), database)
}

/// Request body for `POST /db/{database}/tx/commit`.
pub fn structure_request(agent_id: &str) -> Value {
    json!({
        "statements": [
            {
                "statement": STRUCTURE_QUERY,
                "parameters": { "agent_id": agent_id },
            }
        ]
    })
}

/// Decodes a transactional-endpoint response into rows.
///
/// Fails with [`StoreError::Query`] when the response lists errors, and with
/// [`StoreError::Decode`] when its shape is not the documented one.
pub fn decode_response(body: Value) -> Result<Vec<TopicRow>, StoreError> {
    if let Some(first) = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        return Err(StoreError::Query {
            code: first
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string(),
            message: first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        });
    }

    let result = body
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .ok_or_else(|| StoreError::Decode("missing results".into()))?;
    let columns: Vec<String> = result
        .get("columns")
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::Decode("missing columns".into()))?
        .iter()
        .map(|c| c.as_str().unwrap_or_default().to_string())
        .collect();
    let data = result
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| StoreError::Decode("missing data".into()))?;

    data.iter()
        .map(|entry| {
            let row = entry
                .get("row")
                .and_then(Value::as_array)
                .ok_or_else(|| StoreError::Decode("data entry without row".into()))?;
            if row.len() != columns.len() {
                return Err(StoreError::Decode(format!(
                    "row has {} values for {} columns",
                    row.len(),
                    columns.len()
                )));
            }
            let record: Map<String, Value> =
                columns.iter().cloned().zip(row.iter().cloned()).collect();
            serde_json::from_value(Value::Object(record))
                .map_err(|e| StoreError::Decode(e.to_string()))
        })
        .collect()
}
