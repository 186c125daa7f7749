//! Document Store Abstraction
//!
//! Provides a backend-agnostic trait for a document-oriented store: free-form
//! records grouped into named collections, addressed by backend-assigned ids.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Free-form field map carried by every document.
pub type Document = serde_json::Map<String, Value>;

/// A document as persisted by the store.
///
/// `id` is assigned by the backend on insert and is immutable afterwards.
/// `created_at` is stamped by the store exactly once, on insert, and is
/// never touched by updates. Both are reserved: callers cannot supply them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Document,
}

impl StoredDocument {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up a string field by name.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Document store trait
///
/// Abstracts the NoSQL backend holding the application's records. The
/// contract is deliberately narrow: id-addressed reads and writes plus a
/// single recency-ordered listing. There is no query language and no
/// multi-document atomicity; callers that need cross-document consistency
/// must accept best-effort semantics.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document into `collection`.
    ///
    /// The store assigns the id and stamps `created_at`. Returns the stored
    /// document as persisted.
    async fn insert(&self, collection: &str, fields: Document) -> Result<StoredDocument>;

    /// Fetch a document by id.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>>;

    /// Merge `fields` into the document at `id`, creating it if absent.
    ///
    /// Fields not named in `fields` are left untouched. A document created
    /// through this path gets its `created_at` stamped at creation time.
    async fn set_merge(&self, collection: &str, id: &str, fields: Document) -> Result<()>;

    /// Overwrite the fields of an existing document.
    ///
    /// Fails with [`BridgeError::DocumentNotFound`](crate::BridgeError) when
    /// no document exists at `id`. `id` and `created_at` are preserved.
    async fn update(&self, collection: &str, id: &str, fields: Document) -> Result<()>;

    /// Delete a document by id. Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// List the most recent documents in `collection`, newest first.
    ///
    /// Ordered by `created_at` descending, at most `limit` entries.
    async fn list_recent(&self, collection: &str, limit: usize) -> Result<Vec<StoredDocument>>;

    /// Append `value` to the array field `field` of the document at `id`,
    /// creating the document and/or the array as needed.
    ///
    /// The default implementation is a read-modify-write over the whole
    /// array: concurrent appends to the same document can lose entries
    /// (last write wins on the field). Backends with a native atomic
    /// array-union operation should override this method.
    async fn append_to_array(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> Result<()> {
        let current = self.get(collection, id).await?;
        let mut items = match current.as_ref().and_then(|doc| doc.field(field)) {
            Some(Value::Array(existing)) => existing.clone(),
            _ => Vec::new(),
        };
        items.push(value);

        let mut patch = Document::new();
        patch.insert(field.to_string(), Value::Array(items));
        self.set_merge(collection, id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_document_field_access() {
        let mut fields = Document::new();
        fields.insert("text".to_string(), json!("hello"));
        fields.insert("count".to_string(), json!(3));

        let doc = StoredDocument {
            id: "abc".to_string(),
            created_at: Utc::now(),
            fields,
        };

        assert_eq!(doc.str_field("text"), Some("hello"));
        assert_eq!(doc.field("count"), Some(&json!(3)));
        assert!(doc.field("missing").is_none());
    }

    #[test]
    fn stored_document_serializes_flat() {
        let mut fields = Document::new();
        fields.insert("text".to_string(), json!("hello"));

        let doc = StoredDocument {
            id: "abc".to_string(),
            created_at: Utc::now(),
            fields,
        };

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["id"], json!("abc"));
        assert_eq!(value["text"], json!("hello"));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("fields").is_none());
    }
}
