//! # Core Configuration Module
//!
//! Provides configuration management for the data-access core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`CoreConfig`] instance that injects the backend bridges the gateways
//! run against. It enforces fail-fast validation so a missing backend is
//! reported at construction time with an actionable message, not at the
//! first call site.
//!
//! ## Required Dependencies
//!
//! - `IdentityBackend` - the external identity provider
//! - `DocumentStore` - the document-oriented record store
//! - `BlobStore` - the object-storage service
//!
//! ## Optional Dependencies
//!
//! - `HttpClient` + register-user endpoint - the external collaborator
//!   notified after sign-up. Configuring the endpoint without an HTTP
//!   client is a configuration error.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .identity(Arc::new(MyIdentityBackend))
//!     .documents(Arc::new(MyDocumentStore))
//!     .blobs(Arc::new(MyBlobStore))
//!     .http_client(Arc::new(MyHttpClient))
//!     .register_user_endpoint("https://api.example.com/users/create")
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{BlobStore, DocumentStore, HttpClient, IdentityBackend};
use std::sync::Arc;

use crate::events::DEFAULT_EVENT_BUFFER_SIZE;

/// Role assigned to newly registered users when the caller supplies none.
pub const DEFAULT_USER_ROLE: &str = "user";

/// Core configuration for the data-access layer.
///
/// Holds the injected backend bridges and settings required to construct
/// the service facade. Use [`CoreConfig::builder`] to create instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// The external identity provider
    pub identity: Arc<dyn IdentityBackend>,

    /// The document-oriented record store
    pub documents: Arc<dyn DocumentStore>,

    /// The object-storage service
    pub blobs: Arc<dyn BlobStore>,

    /// HTTP client for collaborator endpoints (required only when
    /// `register_user_endpoint` is set)
    pub http_client: Option<Arc<dyn HttpClient>>,

    /// Endpoint notified after each successful sign-up, fire-and-forget
    pub register_user_endpoint: Option<String>,

    /// Role recorded for new users when the sign-up profile names none
    pub default_role: String,

    /// Buffer size of the broadcast event bus
    pub event_buffer_size: usize,
}

impl CoreConfig {
    /// Start building a configuration.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    identity: Option<Arc<dyn IdentityBackend>>,
    documents: Option<Arc<dyn DocumentStore>>,
    blobs: Option<Arc<dyn BlobStore>>,
    http_client: Option<Arc<dyn HttpClient>>,
    register_user_endpoint: Option<String>,
    default_role: Option<String>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Inject the identity provider bridge.
    pub fn identity(mut self, identity: Arc<dyn IdentityBackend>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Inject the document store bridge.
    pub fn documents(mut self, documents: Arc<dyn DocumentStore>) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Inject the blob store bridge.
    pub fn blobs(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    /// Inject the HTTP client used for collaborator calls.
    pub fn http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Set the register-user collaborator endpoint.
    pub fn register_user_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.register_user_endpoint = Some(endpoint.into());
        self
    }

    /// Override the role recorded for new users.
    pub fn default_role(mut self, role: impl Into<String>) -> Self {
        self.default_role = Some(role.into());
        self
    }

    /// Override the event bus buffer size.
    pub fn event_buffer_size(mut self, capacity: usize) -> Self {
        self.event_buffer_size = Some(capacity);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] when a required backend was not
    /// injected, or when a register-user endpoint is configured without an
    /// HTTP client to reach it.
    pub fn build(self) -> Result<CoreConfig> {
        let identity = self.identity.ok_or_else(|| Error::CapabilityMissing {
            capability: "IdentityBackend".to_string(),
            message: "No identity provider implementation provided. \
                      Tests: use bridge_memory::MemoryIdentityBackend. \
                      Production: inject the vendor adapter."
                .to_string(),
        })?;

        let documents = self.documents.ok_or_else(|| Error::CapabilityMissing {
            capability: "DocumentStore".to_string(),
            message: "No document store implementation provided. \
                      Tests: use bridge_memory::MemoryDocumentStore. \
                      Production: inject the vendor adapter."
                .to_string(),
        })?;

        let blobs = self.blobs.ok_or_else(|| Error::CapabilityMissing {
            capability: "BlobStore".to_string(),
            message: "No blob store implementation provided. \
                      Tests: use bridge_memory::MemoryBlobStore. \
                      Production: inject the vendor adapter."
                .to_string(),
        })?;

        if self.register_user_endpoint.is_some() && self.http_client.is_none() {
            return Err(Error::CapabilityMissing {
                capability: "HttpClient".to_string(),
                message: "A register-user endpoint is configured but no HTTP client \
                          was provided. Native hosts: bridge_desktop::ReqwestHttpClient."
                    .to_string(),
            });
        }

        Ok(CoreConfig {
            identity,
            documents,
            blobs,
            http_client: self.http_client,
            register_user_endpoint: self.register_user_endpoint,
            default_role: self
                .default_role
                .unwrap_or_else(|| DEFAULT_USER_ROLE.to_string()),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        })
    }
}
