//! Service façade and bootstrap helpers.
//!
//! This crate wires the injected backend bridges (identity provider,
//! document store, blob store, optional HTTP client) into the data-access
//! core and exposes the one object application code touches: the
//! [`CoreService`], with its `auth` namespace, `storage` namespace, and
//! per-collection `from(name)` table handles.
//!
//! The service owns no data — all records live in whichever backend
//! persists them — only the translation wiring and the event bus the
//! gateways publish on.
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .identity(identity)
//!     .documents(documents)
//!     .blobs(blobs)
//!     .build()?;
//! let service = CoreService::new(config)?;
//!
//! let session = service.auth().get_session().await;
//! let feed = service.from("posts").select().await;
//! let url = service.storage().from("avatars").get_public_url("u1.png").await;
//! ```

pub mod error;

pub use error::{CoreError, Result};

// Re-exported so embedders configure and consume the service through one
// crate.
pub use core_runtime::config::CoreConfig;
pub use core_runtime::envelope::{Envelope, ErrorCode, ErrorInfo};

use bridge_traits::document::DocumentStore;
use core_auth::{AuthGateway, RegistrationClient};
use core_data::rules::ChallengeAwardRule;
use core_data::{TableHandle, WriteRule};
use core_runtime::events::EventBus;
use core_storage::StorageGateway;
use std::sync::Arc;

/// Primary façade exposed to application code.
#[derive(Clone)]
pub struct CoreService {
    auth: Arc<AuthGateway>,
    storage: StorageGateway,
    documents: Arc<dyn DocumentStore>,
    rules: Arc<[Arc<dyn WriteRule>]>,
    event_bus: EventBus,
}

impl CoreService {
    /// Build the service from a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configured register-user endpoint is not a valid
    /// absolute URL. Missing backends are caught earlier, by
    /// [`CoreConfig::builder`].
    pub fn new(config: CoreConfig) -> Result<Self> {
        let event_bus = EventBus::new(config.event_buffer_size);

        let registration = match (&config.register_user_endpoint, &config.http_client) {
            (Some(endpoint), Some(http)) => {
                Some(RegistrationClient::new(endpoint, Arc::clone(http))?)
            }
            _ => None,
        };

        let auth = AuthGateway::new(
            Arc::clone(&config.identity),
            registration,
            event_bus.clone(),
            config.default_role.clone(),
        );

        let storage = StorageGateway::new(Arc::clone(&config.blobs));

        let rules: Arc<[Arc<dyn WriteRule>]> = Arc::from(vec![
            Arc::new(ChallengeAwardRule::new(event_bus.clone())) as Arc<dyn WriteRule>,
        ]);

        Ok(Self {
            auth: Arc::new(auth),
            storage,
            documents: Arc::clone(&config.documents),
            rules,
            event_bus,
        })
    }

    /// The `auth` namespace.
    pub fn auth(&self) -> &AuthGateway {
        &self.auth
    }

    /// The `storage` namespace.
    pub fn storage(&self) -> &StorageGateway {
        &self.storage
    }

    /// A table handle for `collection`. Cheap; mint one per call site.
    pub fn from(&self, collection: impl Into<String>) -> TableHandle {
        TableHandle::new(
            collection,
            Arc::clone(&self.documents),
            Arc::clone(&self.rules),
            self.event_bus.clone(),
        )
    }

    /// The event bus the gateways publish on.
    pub fn events(&self) -> &EventBus {
        &self.event_bus
    }
}
