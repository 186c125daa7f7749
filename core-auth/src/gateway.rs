//! # Auth Gateway
//!
//! Session-owning facade over the identity provider.
//!
//! ## Overview
//!
//! The `AuthGateway` exposes the fluent auth surface the application is
//! written against while delegating identity work to a pluggable
//! [`IdentityBackend`]. It owns the only piece of state in the adapter: a
//! cached [`Session`] pointer, replaced on every transition.
//!
//! Every public method settles to an [`Envelope`]; nothing here panics or
//! returns a bare error across the boundary.
//!
//! ## State machine
//!
//! ```text
//! SignedOut -> (sign_up | sign_in_with_password | sign_in_with_provider) -> SignedIn
//! SignedIn  -> (update_user) -> SignedIn
//! SignedIn  -> (sign_out) -> SignedOut
//! ```
//!
//! All transitions notify registered watchers and are mirrored onto the
//! runtime event bus.

use crate::error::AuthError;
use crate::registration::{NewUserRegistration, RegistrationClient};
use crate::types::{
    AuthChangeKind, AuthPayload, Credentials, Session, SessionPayload, SignUpParams,
    UpdateUserParams, UserPayload, UserRecord, METADATA_DISPLAY_NAME,
};
use bridge_traits::document::Document;
use bridge_traits::identity::IdentityBackend;
use core_runtime::envelope::Envelope;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

type WatcherCallback = Arc<dyn Fn(AuthChangeKind, Option<Session>) + Send + Sync>;

/// Registry of state-change watchers.
///
/// Callbacks are invoked inline on the transitioning task, outside the lock.
#[derive(Default)]
struct WatcherRegistry {
    watchers: Mutex<HashMap<u64, WatcherCallback>>,
    next_id: AtomicU64,
}

impl WatcherRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, WatcherCallback>> {
        // A poisoned watcher map only means a callback panicked mid-notify;
        // the map itself is still consistent.
        self.watchers.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn register(&self, callback: WatcherCallback) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, callback);
        id
    }

    fn remove(&self, id: u64) {
        self.lock().remove(&id);
    }

    fn notify(&self, kind: AuthChangeKind, session: Option<&Session>) {
        let callbacks: Vec<WatcherCallback> = self.lock().values().cloned().collect();
        for callback in callbacks {
            callback(kind, session.cloned());
        }
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Watcher handle returned by
/// [`AuthGateway::on_auth_state_change`].
///
/// Release it exactly once with [`unsubscribe`](Self::unsubscribe); dropping
/// the handle releases it too, so a forgotten handle cannot leak its
/// callback.
pub struct AuthSubscription {
    registry: Weak<WatcherRegistry>,
    id: u64,
    released: bool,
}

impl AuthSubscription {
    /// Stop receiving state changes.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            if let Some(registry) = self.registry.upgrade() {
                registry.remove(self.id);
            }
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Identity bridge: the `auth` namespace of the service facade.
pub struct AuthGateway {
    identity: Arc<dyn IdentityBackend>,
    registration: Option<RegistrationClient>,
    event_bus: EventBus,
    default_role: String,
    session: RwLock<Option<Session>>,
    watchers: Arc<WatcherRegistry>,
}

impl AuthGateway {
    /// Create a gateway over `identity`.
    ///
    /// `registration`, when present, is notified fire-and-forget after each
    /// successful sign-up or federated sign-in.
    pub fn new(
        identity: Arc<dyn IdentityBackend>,
        registration: Option<RegistrationClient>,
        event_bus: EventBus,
        default_role: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            registration,
            event_bus,
            default_role: default_role.into(),
            session: RwLock::new(None),
            watchers: Arc::new(WatcherRegistry::default()),
        }
    }

    /// Create a new identity and sign it in.
    ///
    /// When the profile seed names a display name it is patched onto the
    /// identity record before this settles. The register-user collaborator
    /// is notified off this task; its failure never fails the sign-up.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, params: SignUpParams) -> Envelope<AuthPayload> {
        let profile = params.profile.clone().unwrap_or_default();

        let user = match self
            .identity
            .create_user(&params.email, &params.password)
            .await
        {
            Ok(user) => user,
            Err(err) => return self.settle_auth_error(err.into()),
        };

        let user = if let Some(display_name) = &profile.display_name {
            let mut patch = Document::new();
            patch.insert(METADATA_DISPLAY_NAME.to_string(), json!(display_name));
            match self.identity.update_metadata(&user.id, patch).await {
                Ok(user) => user,
                Err(err) => return self.settle_auth_error(err.into()),
            }
        } else {
            user
        };

        self.spawn_registration(&user, profile.role);

        info!(user_id = %user.id, "Sign-up completed");
        let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::SignedUp {
            user_id: user.id.clone(),
            email: user.email.clone(),
        }));

        self.install_session(user.clone(), AuthChangeKind::SignedIn)
            .await;
        Envelope::ok(AuthPayload { user })
    }

    /// Verify an email/password pair and install the session.
    #[instrument(skip_all)]
    pub async fn sign_in_with_password(&self, credentials: Credentials) -> Envelope<AuthPayload> {
        match self
            .identity
            .authenticate(&credentials.email, &credentials.password)
            .await
        {
            Ok(user) => {
                info!(user_id = %user.id, "Sign-in completed");
                let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::SignedIn {
                    user_id: user.id.clone(),
                }));
                self.install_session(user.clone(), AuthChangeKind::SignedIn)
                    .await;
                Envelope::ok(AuthPayload { user })
            }
            Err(err) => self.settle_auth_error(err.into()),
        }
    }

    /// Complete a federated sign-in (e.g. `"google"`) and install the
    /// session. The register-user collaborator is notified the same way as
    /// for a password sign-up.
    #[instrument(skip(self))]
    pub async fn sign_in_with_provider(&self, provider: &str) -> Envelope<AuthPayload> {
        match self.identity.federated_sign_in(provider).await {
            Ok(user) => {
                self.spawn_registration(&user, None);

                info!(user_id = %user.id, provider, "Federated sign-in completed");
                let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::SignedIn {
                    user_id: user.id.clone(),
                }));
                self.install_session(user.clone(), AuthChangeKind::SignedIn)
                    .await;
                Envelope::ok(AuthPayload { user })
            }
            Err(err) => self.settle_auth_error(err.into()),
        }
    }

    /// Clear the local session.
    ///
    /// Purely adapter-local: the identity provider is not called, and the
    /// operation cannot fail.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Envelope<()> {
        let previous = {
            let mut session = self.session.write().await;
            session.take()
        };

        let user_id = previous.map(|s| s.user.id);
        info!(user_id = ?user_id, "Signed out");
        let _ = self
            .event_bus
            .emit(CoreEvent::Auth(AuthEvent::SignedOut { user_id }));
        self.watchers.notify(AuthChangeKind::SignedOut, None);

        Envelope::ok(())
    }

    /// Trigger the provider's out-of-band password reset flow.
    ///
    /// Success only means the provider accepted the request; delivery is
    /// asynchronous and unverified.
    #[instrument(skip(self, email))]
    pub async fn reset_password_for_email(&self, email: &str) -> Envelope<()> {
        match self.identity.send_password_reset(email).await {
            Ok(()) => Envelope::ok(()),
            Err(err) => self.settle_auth_error(err.into()),
        }
    }

    /// Read the cached user, with no freshness guarantee.
    pub async fn get_user(&self) -> Envelope<UserPayload> {
        let session = self.session.read().await;
        Envelope::ok(UserPayload {
            user: session.as_ref().map(|s| s.user.clone()),
        })
    }

    /// Read the cached session, with no freshness guarantee.
    pub async fn get_session(&self) -> Envelope<SessionPayload> {
        let session = self.session.read().await;
        Envelope::ok(SessionPayload {
            session: session.clone(),
        })
    }

    /// Register `callback` for identity transitions.
    ///
    /// The callback fires once immediately with the current state
    /// ([`AuthChangeKind::InitialSession`]) and then on every transition
    /// until the returned handle is released.
    pub async fn on_auth_state_change<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(AuthChangeKind, Option<Session>) + Send + Sync + 'static,
    {
        let callback: WatcherCallback = Arc::new(callback);
        let id = self.watchers.register(callback.clone());

        let current = self.session.read().await.clone();
        callback(AuthChangeKind::InitialSession, current);

        AuthSubscription {
            registry: Arc::downgrade(&self.watchers),
            id,
            released: false,
        }
    }

    /// Merge `data` into the active user's profile metadata bag.
    ///
    /// Fails with `no active user` while signed out; nothing reaches the
    /// provider in that case.
    #[instrument(skip_all)]
    pub async fn update_user(&self, params: UpdateUserParams) -> Envelope<AuthPayload> {
        let user_id = {
            let session = self.session.read().await;
            match session.as_ref() {
                Some(session) => session.user.id.clone(),
                None => return self.settle_auth_error(AuthError::NoActiveUser),
            }
        };

        match self.identity.update_metadata(&user_id, params.data).await {
            Ok(user) => {
                let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::UserUpdated {
                    user_id: user.id.clone(),
                }));
                self.install_session(user.clone(), AuthChangeKind::UserUpdated)
                    .await;
                Envelope::ok(AuthPayload { user })
            }
            Err(err) => self.settle_auth_error(err.into()),
        }
    }

    /// Number of live state-change watchers, for lifecycle assertions.
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    async fn install_session(&self, user: UserRecord, kind: AuthChangeKind) {
        let new_session = Session { user };
        {
            let mut session = self.session.write().await;
            *session = Some(new_session.clone());
        }
        self.watchers.notify(kind, Some(&new_session));
    }

    fn spawn_registration(&self, user: &UserRecord, role: Option<String>) {
        let Some(registration) = &self.registration else {
            return;
        };

        registration.spawn_register(NewUserRegistration {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user
                .metadata_str(METADATA_DISPLAY_NAME)
                .unwrap_or_default()
                .to_string(),
            role: role.unwrap_or_else(|| self.default_role.clone()),
        });
    }

    fn settle_auth_error<T>(&self, err: AuthError) -> Envelope<T> {
        warn!(error = %err, "Identity operation failed");
        let _ = self.event_bus.emit(CoreEvent::Auth(AuthEvent::AuthError {
            message: err.to_string(),
        }));
        Envelope::err(err)
    }
}
