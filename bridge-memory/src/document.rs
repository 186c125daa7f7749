//! In-memory document store.

use async_trait::async_trait;
use bridge_traits::document::{Document, DocumentStore, StoredDocument};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::time::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

struct Entry {
    doc: StoredDocument,
    // Insertion sequence; breaks created_at ties so recency listing is a
    // strict order even for same-instant writes.
    seq: u64,
}

/// In-memory [`DocumentStore`].
///
/// Collections are plain maps keyed by backend-assigned uuid ids. The clock
/// is injectable so `createdAt` stamping is deterministic under test.
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
    seq: AtomicU64,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            clock,
            seq: AtomicU64::new(0),
        }
    }

    /// Number of documents currently held by `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        let collections = self.collections.lock().await;
        collections.get(collection).map_or(0, HashMap::len)
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: &str, fields: Document) -> Result<StoredDocument> {
        let doc = StoredDocument {
            id: Uuid::new_v4().to_string(),
            created_at: self.clock.now(),
            fields,
        };

        let mut collections = self.collections.lock().await;
        collections.entry(collection.to_string()).or_default().insert(
            doc.id.clone(),
            Entry {
                doc: doc.clone(),
                seq: self.next_seq(),
            },
        );
        Ok(doc)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|entry| entry.doc.clone()))
    }

    async fn set_merge(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.get_mut(id) {
            Some(entry) => {
                for (key, value) in fields {
                    entry.doc.fields.insert(key, value);
                }
            }
            None => {
                let doc = StoredDocument {
                    id: id.to_string(),
                    created_at: self.clock.now(),
                    fields,
                };
                let seq = self.next_seq();
                docs.insert(id.to_string(), Entry { doc, seq });
            }
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<()> {
        let mut collections = self.collections.lock().await;
        let entry = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| BridgeError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        entry.doc.fields = fields;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.lock().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn list_recent(&self, collection: &str, limit: usize) -> Result<Vec<StoredDocument>> {
        let collections = self.collections.lock().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut entries: Vec<&Entry> = docs.values().collect();
        entries.sort_by(|a, b| {
            b.doc
                .created_at
                .cmp(&a.doc.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|entry| entry.doc.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, serde_json::Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = MemoryDocumentStore::new();
        let doc = store
            .insert("posts", fields(&[("text", json!("hi"))]))
            .await
            .unwrap();

        assert!(!doc.id.is_empty());
        assert_eq!(doc.str_field("text"), Some("hi"));

        let fetched = store.get("posts", &doc.id).await.unwrap().unwrap();
        assert_eq!(fetched, doc);
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let store = MemoryDocumentStore::new();
        for i in 0..5 {
            store
                .insert("posts", fields(&[("n", json!(i))]))
                .await
                .unwrap();
        }

        let listed = store.list_recent("posts", 3).await.unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].field("n"), Some(&json!(4)));
        assert_eq!(listed[1].field("n"), Some(&json!(3)));
        assert_eq!(listed[2].field("n"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn update_overwrites_and_preserves_reserved_fields() {
        let store = MemoryDocumentStore::new();
        let doc = store
            .insert("posts", fields(&[("text", json!("old")), ("kept", json!(1))]))
            .await
            .unwrap();

        store
            .update("posts", &doc.id, fields(&[("text", json!("new"))]))
            .await
            .unwrap();

        let fetched = store.get("posts", &doc.id).await.unwrap().unwrap();
        assert_eq!(fetched.str_field("text"), Some("new"));
        // Full overwrite, not a merge
        assert!(fetched.field("kept").is_none());
        assert_eq!(fetched.id, doc.id);
        assert_eq!(fetched.created_at, doc.created_at);
    }

    #[tokio::test]
    async fn update_missing_document_fails() {
        let store = MemoryDocumentStore::new();
        let result = store.update("posts", "nope", Document::new()).await;
        assert!(matches!(
            result,
            Err(BridgeError::DocumentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn set_merge_creates_then_merges() {
        let store = MemoryDocumentStore::new();
        store
            .set_merge("users", "u1", fields(&[("displayName", json!("Ana"))]))
            .await
            .unwrap();
        store
            .set_merge("users", "u1", fields(&[("role", json!("user"))]))
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.str_field("displayName"), Some("Ana"));
        assert_eq!(doc.str_field("role"), Some("user"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        let doc = store.insert("posts", Document::new()).await.unwrap();

        store.delete("posts", &doc.id).await.unwrap();
        assert!(store.get("posts", &doc.id).await.unwrap().is_none());
        // Deleting again is not an error
        store.delete("posts", &doc.id).await.unwrap();
    }

    #[tokio::test]
    async fn append_to_array_builds_up_entries() {
        let store = MemoryDocumentStore::new();
        store
            .append_to_array("users", "u1", "medals", json!({ "challengeId": "c1" }))
            .await
            .unwrap();
        store
            .append_to_array("users", "u1", "medals", json!({ "challengeId": "c2" }))
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().unwrap();
        let medals = doc.field("medals").unwrap().as_array().unwrap();
        assert_eq!(medals.len(), 2);
        assert_eq!(medals[1]["challengeId"], json!("c2"));
    }
}
