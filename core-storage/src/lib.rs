//! # Storage Gateway Module
//!
//! Bucket-scoped blob surface over the object-storage backend.
//!
//! ## Overview
//!
//! This module exposes the `storage` namespace of the service facade:
//! [`StorageGateway::from`] scopes a [`BucketHandle`] to one bucket, which
//! uploads objects and resolves public URLs. Both operations settle to the
//! shared result envelope; storage failures are captured, never thrown.

pub mod bucket;
pub mod error;

pub use bucket::{BucketHandle, PublicUrl, StorageGateway, UploadedObject};
pub use error::{Result, StorageError};
