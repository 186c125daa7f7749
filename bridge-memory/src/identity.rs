//! In-memory identity provider.

use async_trait::async_trait;
use bridge_traits::document::Document;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::identity::{IdentityBackend, IdentityUser};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Minimum password length accepted at account creation, matching the
/// common provider policy.
const MIN_PASSWORD_LEN: usize = 6;

struct StoredIdentity {
    user: IdentityUser,
    password_digest: [u8; 32],
}

/// In-memory [`IdentityBackend`].
///
/// Accounts are keyed by email. Passwords are kept only as SHA-256 digests;
/// this is a test fixture, not a production credential store. Federated
/// sign-ins return identities staged in advance with
/// [`stage_federated_user`](Self::stage_federated_user).
#[derive(Default)]
pub struct MemoryIdentityBackend {
    accounts: Mutex<HashMap<String, StoredIdentity>>,
    federated: Mutex<HashMap<String, IdentityUser>>,
    reset_requests: Mutex<Vec<String>>,
}

impl MemoryIdentityBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the identity returned by the next federated sign-in with
    /// `provider`.
    pub async fn stage_federated_user(&self, provider: &str, user: IdentityUser) {
        let mut federated = self.federated.lock().await;
        federated.insert(provider.to_string(), user);
    }

    /// Emails for which a password reset was requested, oldest first.
    pub async fn reset_requests(&self) -> Vec<String> {
        self.reset_requests.lock().await.clone()
    }

    fn digest(password: &str) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }
}

#[async_trait]
impl IdentityBackend for MemoryIdentityBackend {
    async fn create_user(&self, email: &str, password: &str) -> Result<IdentityUser> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(BridgeError::CredentialsRejected(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(email) {
            return Err(BridgeError::OperationFailed(format!(
                "email already registered: {}",
                email
            )));
        }

        let user = IdentityUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            metadata: Document::new(),
        };
        accounts.insert(
            email.to_string(),
            StoredIdentity {
                user: user.clone(),
                password_digest: Self::digest(password),
            },
        );

        debug!(user_id = %user.id, "Created in-memory identity");
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<IdentityUser> {
        let accounts = self.accounts.lock().await;
        let stored = accounts.get(email).ok_or_else(|| {
            BridgeError::CredentialsRejected("invalid email or password".to_string())
        })?;

        if stored.password_digest != Self::digest(password) {
            return Err(BridgeError::CredentialsRejected(
                "invalid email or password".to_string(),
            ));
        }

        Ok(stored.user.clone())
    }

    async fn federated_sign_in(&self, provider: &str) -> Result<IdentityUser> {
        let federated = self.federated.lock().await;
        federated.get(provider).cloned().ok_or_else(|| {
            BridgeError::CredentialsRejected(format!(
                "no federated identity staged for provider: {}",
                provider
            ))
        })
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        // Delivery is out of band; accepting the request is all a provider
        // guarantees, so unknown emails are accepted too.
        let mut requests = self.reset_requests.lock().await;
        requests.push(email.to_string());
        Ok(())
    }

    async fn update_metadata(&self, user_id: &str, patch: Document) -> Result<IdentityUser> {
        let mut accounts = self.accounts.lock().await;
        let stored = accounts
            .values_mut()
            .find(|stored| stored.user.id == user_id)
            .ok_or_else(|| {
                BridgeError::OperationFailed(format!("unknown user id: {}", user_id))
            })?;

        for (key, value) in patch {
            stored.user.metadata.insert(key, value);
        }
        Ok(stored.user.clone())
    }
}
