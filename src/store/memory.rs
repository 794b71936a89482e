//! In-memory document store for development and tests

use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use super::{Document, DocumentStore, RecordId, StoreError, Value};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<(RecordId, Document)>>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following write fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of create calls received, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Records stored in a collection, in creation order
    pub fn records(&self, collection: &str) -> Vec<(RecordId, Document)> {
        self.collections
            .lock()
            .map(|collections| collections.get(collection).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_record(&self, collection: &str, mut record: Document) -> Result<RecordId, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store set to fail".to_string()));
        }

        let now = Utc::now();
        for value in record.values_mut() {
            if *value == Value::ServerTimestamp {
                *value = Value::Timestamp(now);
            }
        }

        let id = RecordId::generate();
        let mut collections = self
            .collections
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), record));

        tracing::debug!("Stored record {} in memory collection {}", id, collection);
        Ok(id)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
