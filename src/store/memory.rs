//! In-process document store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use super::{Document, DocumentStore, Filter, Listener, Subscription};
use crate::error::{BookingError, BookingResult};
use crate::{generate_id, Id};

type Listeners = DashMap<String, Vec<(u64, Listener)>>;

/// Document store kept in memory, with the same call shape as the hosted one.
///
/// Collections are created on first write. Listeners run on the writer's
/// task after the write has landed, and never while a map shard is locked,
/// so a listener may read the store again.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, BTreeMap<Id, Value>>,
    listeners: Arc<Listeners>,
    next_listener: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        self.collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn notify(&self, collection: &str) {
        let listeners: Vec<Listener> = match self.listeners.get(collection) {
            Some(entry) => entry.iter().map(|(_, l)| l.clone()).collect(),
            None => return,
        };
        if listeners.is_empty() {
            return;
        }
        let documents = self.snapshot(collection);
        for listener in listeners {
            listener(&documents);
        }
    }

    fn ensure_object(document: &Value) -> BookingResult<()> {
        if document.is_object() {
            Ok(())
        } else {
            Err(BookingError::validation("Document body must be a JSON object"))
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, document: Value) -> BookingResult<Id> {
        Self::ensure_object(&document)?;
        let id = generate_id();
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);
        debug!(collection, id = %id, "document created");
        self.notify(collection);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> BookingResult<()> {
        Self::ensure_object(&document)?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        debug!(collection, id, "document set");
        self.notify(collection);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> BookingResult<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(id).map(|data| Document::new(id, data.clone()))))
    }

    async fn query(&self, collection: &str, filters: &[Filter]) -> BookingResult<Vec<Document>> {
        let mut documents = self.snapshot(collection);
        documents.retain(|doc| filters.iter().all(|f| f.matches(&doc.data)));
        debug!(collection, hits = documents.len(), "query");
        Ok(documents)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> BookingResult<()> {
        let Value::Object(fields) = patch else {
            return Err(BookingError::validation("Update must be a JSON object"));
        };
        {
            let not_found = || BookingError::not_found(collection, id);
            let mut docs = self.collections.get_mut(collection).ok_or_else(not_found)?;
            let doc = docs.get_mut(id).ok_or_else(not_found)?;
            let Value::Object(target) = doc else {
                return Err(BookingError::Store(format!(
                    "{collection}/{id} is not an object"
                )));
            };
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        debug!(collection, id, "document updated");
        self.notify(collection);
        Ok(())
    }

    fn subscribe(&self, collection: &str, listener: Listener) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .entry(collection.to_string())
            .or_default()
            .push((id, listener.clone()));
        listener(&self.snapshot(collection));

        let registry = Arc::downgrade(&self.listeners);
        let collection = collection.to_string();
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                if let Some(mut entry) = registry.get_mut(&collection) {
                    entry.retain(|(lid, _)| *lid != id);
                }
            }
        })
    }
}
