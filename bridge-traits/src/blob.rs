//! Blob Storage Abstraction
//!
//! Object upload and public URL resolution against the external blob-storage
//! service. Objects live under `bucket/path` keys; there is no listing,
//! no metadata surface, and no optimistic concurrency.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Blob store trait
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `bucket/path`.
    ///
    /// A colliding path is overwritten silently; there is no precondition
    /// check and no version token.
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<()>;

    /// Resolve `bucket/path` to a fetchable URL.
    ///
    /// Resolution is derived from configuration; the object's existence is
    /// not verified.
    async fn resolve_public_url(&self, bucket: &str, path: &str) -> Result<String>;
}
