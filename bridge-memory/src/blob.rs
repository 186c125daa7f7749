//! In-memory blob store.

use async_trait::async_trait;
use bridge_traits::blob::BlobStore;
use bridge_traits::error::Result;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A blob as held by the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// In-memory [`BlobStore`].
///
/// Objects are keyed by `(bucket, path)`. Public URLs are derived from a
/// configurable base without checking the object exists, matching the
/// contract of the real service.
pub struct MemoryBlobStore {
    base_url: String,
    objects: Mutex<HashMap<(String, String), StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::with_base_url("memory://blobs")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a stored object, for assertions in tests.
    pub async fn object(&self, bucket: &str, path: &str) -> Option<StoredBlob> {
        let objects = self.objects.lock().await;
        objects.get(&(bucket.to_string(), path.to_string())).cloned()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<()> {
        let mut objects = self.objects.lock().await;
        // Silent overwrite on collision, per the storage contract
        objects.insert(
            (bucket.to_string(), path.to_string()),
            StoredBlob {
                data,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(())
    }

    async fn resolve_public_url(&self, bucket: &str, path: &str) -> Result<String> {
        Ok(format!("{}/{}/{}", self.base_url, bucket, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_and_read_back() {
        let store = MemoryBlobStore::new();
        store
            .put_object("avatars", "u1.png", Bytes::from_static(b"img"), Some("image/png"))
            .await
            .unwrap();

        let blob = store.object("avatars", "u1.png").await.unwrap();
        assert_eq!(blob.data, Bytes::from_static(b"img"));
        assert_eq!(blob.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn collision_overwrites_silently() {
        let store = MemoryBlobStore::new();
        store
            .put_object("avatars", "u1.png", Bytes::from_static(b"old"), None)
            .await
            .unwrap();
        store
            .put_object("avatars", "u1.png", Bytes::from_static(b"new"), None)
            .await
            .unwrap();

        let blob = store.object("avatars", "u1.png").await.unwrap();
        assert_eq!(blob.data, Bytes::from_static(b"new"));
    }

    #[tokio::test]
    async fn public_url_does_not_require_object() {
        let store = MemoryBlobStore::with_base_url("https://cdn.example.com");
        let url = store.resolve_public_url("avatars", "missing.png").await.unwrap();
        assert_eq!(url, "https://cdn.example.com/avatars/missing.png");
    }
}
