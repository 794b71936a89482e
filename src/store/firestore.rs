//! Firestore REST client
//!
//! Records are created through the `documents:commit` endpoint so that
//! server timestamps can be applied as field transforms in the same write.

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{collections::BTreeMap, time::Duration};

use super::{Document, DocumentStore, RecordId, StoreError, Value};
use crate::config::FirestoreConfig;

#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    commit_url: String,
    database_path: String,
    api_key: Option<String>,
    auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommitRequest {
    writes: Vec<Write>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Write {
    update: FirestoreDocument,
    current_document: Precondition,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    update_transforms: Vec<FieldTransform>,
}

#[derive(Debug, Serialize)]
struct FirestoreDocument {
    name: String,
    fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct Precondition {
    exists: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldTransform {
    field_path: String,
    set_to_server_value: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitResponse {
    #[serde(default)]
    write_results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

impl FirestoreStore {
    /// Build a client for the configured project and database
    pub fn new(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let database_path = format!(
            "projects/{}/databases/{}",
            config.project_id, config.database
        );
        let commit_url = format!(
            "{}/v1/{}/documents:commit",
            config.base_url.trim_end_matches('/'),
            database_path
        );

        Ok(Self {
            client,
            commit_url,
            database_path,
            api_key: config.api_key.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn build_commit(&self, collection: &str, id: &RecordId, record: Document) -> CommitRequest {
        let mut fields = BTreeMap::new();
        let mut update_transforms = Vec::new();

        for (name, value) in record {
            match encode_value(value) {
                Some(encoded) => {
                    fields.insert(name, encoded);
                }
                None => update_transforms.push(FieldTransform {
                    field_path: name,
                    set_to_server_value: "REQUEST_TIME",
                }),
            }
        }

        CommitRequest {
            writes: vec![Write {
                update: FirestoreDocument {
                    name: format!("{}/documents/{}/{}", self.database_path, collection, id),
                    fields,
                },
                current_document: Precondition { exists: false },
                update_transforms,
            }],
        }
    }
}

/// Firestore typed value; `None` for values the server fills in
fn encode_value(value: Value) -> Option<serde_json::Value> {
    match value {
        Value::String(s) => Some(json!({ "stringValue": s })),
        Value::Bool(b) => Some(json!({ "booleanValue": b })),
        Value::Timestamp(ts) => Some(json!({
            "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true)
        })),
        Value::ServerTimestamp => None,
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn create_record(&self, collection: &str, record: Document) -> Result<RecordId, StoreError> {
        let id = RecordId::generate();
        let body = self.build_commit(collection, &id, record);

        let mut request = self.client.post(&self.commit_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("Committing {}/{} to Firestore", collection, id);
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let message = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => match envelope.error.status {
                    Some(code) => format!("{}: {}", code, envelope.error.message),
                    None => envelope.error.message,
                },
                Err(_) => text,
            };
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let commit: CommitResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        if commit.write_results.len() != 1 {
            return Err(StoreError::Decode(format!(
                "expected 1 write result, got {}",
                commit.write_results.len()
            )));
        }

        Ok(id)
    }

    fn backend_name(&self) -> &'static str {
        "firestore"
    }
}
