//! In-memory store implementation for testing and embedding.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex as StdMutex;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::models::{Id, IdGenerator, UuidIdGenerator};

use super::{DocumentStore, RawRecord, RecordFilter};

/// In-memory document store.
///
/// Honors the [`DocumentStore`] query contract (equality filter, timestamp
/// descending, limit) and can be told to fail reads or writes for a named
/// collection, so the degradation paths are testable.
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<RawRecord>>>,
    failing_fetches: StdMutex<HashSet<String>>,
    failing_inserts: StdMutex<HashSet<String>>,
    ids: Box<dyn IdGenerator>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(UuidIdGenerator))
    }

    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            failing_fetches: StdMutex::new(HashSet::new()),
            failing_inserts: StdMutex::new(HashSet::new()),
            ids,
        }
    }

    /// Make every subsequent fetch from `collection` fail.
    pub fn fail_fetches(&self, collection: &str) {
        self.failing_fetches
            .lock()
            .expect("failure flag lock poisoned")
            .insert(collection.to_string());
    }

    /// Make every subsequent insert into `collection` fail.
    pub fn fail_inserts(&self, collection: &str) {
        self.failing_inserts
            .lock()
            .expect("failure flag lock poisoned")
            .insert(collection.to_string());
    }

    /// Raw contents of a collection, in insertion order.
    pub async fn records(&self, collection: &str) -> Vec<RawRecord> {
        let collections = self.collections.lock().await;
        collections.get(collection).cloned().unwrap_or_default()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(
        &self,
        collection: &str,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<RawRecord>> {
        {
            let failing = self
                .failing_fetches
                .lock()
                .expect("failure flag lock poisoned");
            if failing.contains(collection) {
                anyhow::bail!("collection '{collection}' unavailable");
            }
        }

        let collections = self.collections.lock().await;
        let mut matches: Vec<RawRecord> = collections
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.user_id == filter.user_id)
                    .filter(|r| filter.kind.as_deref().map_or(true, |k| r.kind == k))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        // Undated records sort last; the query contract is newest-first.
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn insert(&self, collection: &str, record: &RawRecord) -> Result<Id> {
        {
            let failing = self
                .failing_inserts
                .lock()
                .expect("failure flag lock poisoned");
            if failing.contains(collection) {
                anyhow::bail!("collection '{collection}' rejected the write");
            }
        }

        let mut stored = record.clone();
        let id = match &stored.id {
            Some(existing) => Id::from_string(existing.clone()),
            None => {
                let id = self.ids.new_id();
                stored.id = Some(id.as_str().to_string());
                id
            }
        };

        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(stored);
        Ok(id)
    }
}
