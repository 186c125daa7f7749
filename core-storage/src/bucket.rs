//! Bucket-scoped blob operations.

use crate::error::StorageError;
use bridge_traits::blob::BlobStore;
use bytes::Bytes;
use core_runtime::envelope::Envelope;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// `{ key, publicUrl }` payload settled by [`BucketHandle::upload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedObject {
    /// The path the object was stored under, relative to the bucket.
    pub key: String,
    #[serde(rename = "publicUrl")]
    pub public_url: String,
}

/// `{ publicUrl }` payload settled by [`BucketHandle::get_public_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUrl {
    #[serde(rename = "publicUrl")]
    pub public_url: String,
}

/// The `storage` namespace: scopes bucket handles over the shared backend.
#[derive(Clone)]
pub struct StorageGateway {
    blobs: Arc<dyn BlobStore>,
}

impl StorageGateway {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// A handle scoped to `bucket`. Cheap; mint one per call site.
    pub fn from(&self, bucket: impl Into<String>) -> BucketHandle {
        BucketHandle {
            bucket: bucket.into(),
            blobs: Arc::clone(&self.blobs),
        }
    }
}

/// Blob operations scoped to one bucket.
#[derive(Clone)]
pub struct BucketHandle {
    bucket: String,
    blobs: Arc<dyn BlobStore>,
}

impl BucketHandle {
    /// The bucket this handle writes to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Store `data` under `path` and settle to the key plus its resolved
    /// public URL. A colliding path is overwritten silently.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, path = %path))]
    pub async fn upload(
        &self,
        path: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Envelope<UploadedObject> {
        if let Err(err) = self
            .blobs
            .put_object(&self.bucket, path, data, content_type)
            .await
        {
            return Envelope::err(StorageError::from(err));
        }

        match self.blobs.resolve_public_url(&self.bucket, path).await {
            Ok(public_url) => {
                debug!("Object uploaded");
                Envelope::ok(UploadedObject {
                    key: path.to_string(),
                    public_url,
                })
            }
            Err(err) => Envelope::err(StorageError::from(err)),
        }
    }

    /// Resolve `path` to a fetchable URL without verifying the object
    /// exists.
    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    pub async fn get_public_url(&self, path: &str) -> Envelope<PublicUrl> {
        match self.blobs.resolve_public_url(&self.bucket, path).await {
            Ok(public_url) => Envelope::ok(PublicUrl { public_url }),
            Err(err) => Envelope::err(StorageError::from(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_memory::MemoryBlobStore;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use core_runtime::envelope::ErrorCode;

    /// Blob store whose every call fails at the transport level.
    struct OfflineBlobs;

    #[async_trait]
    impl BlobStore for OfflineBlobs {
        async fn put_object(
            &self,
            _bucket: &str,
            _path: &str,
            _data: Bytes,
            _content_type: Option<&str>,
        ) -> BridgeResult<()> {
            Err(BridgeError::OperationFailed("bucket offline".to_string()))
        }

        async fn resolve_public_url(&self, _bucket: &str, _path: &str) -> BridgeResult<String> {
            Err(BridgeError::OperationFailed("bucket offline".to_string()))
        }
    }

    #[tokio::test]
    async fn upload_settles_key_and_public_url() {
        let blobs = Arc::new(MemoryBlobStore::with_base_url("https://cdn.example.com"));
        let storage = StorageGateway::new(blobs.clone());

        let uploaded = storage
            .from("avatars")
            .upload("u1/pic.png", Bytes::from_static(b"img"), Some("image/png"))
            .await
            .into_result()
            .unwrap();

        assert_eq!(uploaded.key, "u1/pic.png");
        assert_eq!(uploaded.public_url, "https://cdn.example.com/avatars/u1/pic.png");
        assert!(blobs.object("avatars", "u1/pic.png").await.is_some());
    }

    #[tokio::test]
    async fn upload_overwrites_colliding_path() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let storage = StorageGateway::new(blobs.clone());
        let bucket = storage.from("avatars");

        bucket
            .upload("pic.png", Bytes::from_static(b"old"), None)
            .await
            .into_result()
            .unwrap();
        bucket
            .upload("pic.png", Bytes::from_static(b"new"), None)
            .await
            .into_result()
            .unwrap();

        let blob = blobs.object("avatars", "pic.png").await.unwrap();
        assert_eq!(blob.data, Bytes::from_static(b"new"));
    }

    #[tokio::test]
    async fn get_public_url_does_not_verify_existence() {
        let blobs = Arc::new(MemoryBlobStore::with_base_url("https://cdn.example.com"));
        let storage = StorageGateway::new(blobs);

        let resolved = storage
            .from("avatars")
            .get_public_url("never-uploaded.png")
            .await
            .into_result()
            .unwrap();

        assert_eq!(
            resolved.public_url,
            "https://cdn.example.com/avatars/never-uploaded.png"
        );
    }

    #[tokio::test]
    async fn backend_failure_settles_error_envelope() {
        let storage = StorageGateway::new(Arc::new(OfflineBlobs));

        let envelope = storage
            .from("avatars")
            .upload("pic.png", Bytes::from_static(b"x"), None)
            .await;
        let error = envelope.error.unwrap();
        assert_eq!(error.code, ErrorCode::Backend);
        assert!(error.message.contains("bucket offline"));

        let envelope = storage.from("avatars").get_public_url("pic.png").await;
        assert_eq!(envelope.error.unwrap().code, ErrorCode::Backend);
    }
}
