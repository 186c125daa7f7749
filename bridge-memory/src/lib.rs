//! # In-Memory Backend Bridges
//!
//! Reference implementations of the backend bridge traits, held entirely in
//! process memory. They back the test suites of every gateway crate and are
//! good enough for local development of callers that do not need durability.
//!
//! ## Implementations
//!
//! - [`MemoryIdentityBackend`] - email/password identities with a staged
//!   federated sign-in hook
//! - [`MemoryDocumentStore`] - per-collection document maps with
//!   insertion-ordered recency listing
//! - [`MemoryBlobStore`] - bucket/path object map with configurable
//!   public-URL base
//! - [`RecordingHttpClient`] - records outbound requests and replays a
//!   configured response
//!
//! Nothing here is safe across processes; every store is a `tokio::sync`
//! protected map behind an `Arc`-cloneable handle.

pub mod blob;
pub mod document;
pub mod http;
pub mod identity;

pub use blob::MemoryBlobStore;
pub use document::MemoryDocumentStore;
pub use http::RecordingHttpClient;
pub use identity::MemoryIdentityBackend;
