//! Document store clients
//!
//! Booking records are written through the [`DocumentStore`] trait so the
//! submission flow never knows which backend it is talking to.

pub mod firestore;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use std::{collections::BTreeMap, fmt};
use thiserror::Error;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Field value of a stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// Placeholder resolved by the store at write time
    ServerTimestamp,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// Record sent to the store, keyed by field name
pub type Document = BTreeMap<String, Value>;

/// Identifier of a created record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Length of generated document ids
const AUTO_ID_LEN: usize = 20;

impl RecordId {
    /// Random 20 character alphanumeric id, the same shape Firestore clients generate
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(AUTO_ID_LEN)
            .map(char::from)
            .collect();
        RecordId(id)
    }
}

/// Failure of a remote create call
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store rejected write ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected store response: {0}")]
    Decode(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Client able to create records in a named collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create one record; server timestamps are resolved by the store
    async fn create_record(&self, collection: &str, record: Document) -> Result<RecordId, StoreError>;

    /// Short name used in logs and readiness output
    fn backend_name(&self) -> &'static str;
}
