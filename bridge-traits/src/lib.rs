//! # Backend Bridge Traits
//!
//! Narrow interfaces that must be implemented for each backend service the
//! data-access core talks to.
//!
//! ## Overview
//!
//! This crate defines the contract between the core gateways and the three
//! external services they translate between: an identity provider, a
//! document-oriented store, and a blob-storage service. Each trait represents
//! one backend capability; the core never sees a vendor SDK, only these
//! seams.
//!
//! ## Traits
//!
//! ### Backends
//! - [`IdentityBackend`](identity::IdentityBackend) - Account creation, password and federated sign-in, profile metadata
//! - [`DocumentStore`](document::DocumentStore) - Free-form records per collection, id-addressed, recency-ordered listing
//! - [`BlobStore`](blob::BlobStore) - Object upload and public URL resolution
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP for the external collaborator endpoints
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Fail-Fast Strategy
//!
//! The core should fail fast with descriptive errors when a required backend
//! is missing:
//!
//! ```ignore
//! use core_runtime::error::Error;
//!
//! let documents = config.documents
//!     .ok_or_else(|| Error::CapabilityMissing {
//!         capability: "DocumentStore".to_string(),
//!         message: "No document store provided. \
//!                  Tests: use bridge_memory::MemoryDocumentStore. \
//!                  Production: inject the vendor adapter.".to_string()
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Backend implementations should:
//!
//! - Convert vendor-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (collection names, bucket/path pairs)
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so a single backend handle
//! can be shared across async tasks behind an `Arc`.

pub mod blob;
pub mod document;
pub mod error;
pub mod http;
pub mod identity;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use blob::BlobStore;
pub use document::{Document, DocumentStore, StoredDocument};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use identity::{IdentityBackend, IdentityUser};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
