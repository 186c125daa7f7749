//! Identity Provider Abstraction
//!
//! Wraps the external authentication backend. The core keeps session state
//! locally; this trait only covers the calls that reach the provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::Result;

/// A user record as held by the identity provider.
///
/// The record is owned by the provider; the core only reads it and patches
/// the `metadata` bag (display name, role, arbitrary profile fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub metadata: Document,
}

impl IdentityUser {
    /// Read a string entry from the metadata bag.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// Identity provider trait
///
/// Session lifecycle (current user, sign-out, state-change notification) is
/// owned by the core's auth gateway, not by this trait: the backend is only
/// asked to mint, verify, and patch identity records.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Create a new identity from an email/password pair.
    ///
    /// Fails when the email is already registered or the password is
    /// rejected by the provider's policy.
    async fn create_user(&self, email: &str, password: &str) -> Result<IdentityUser>;

    /// Verify an email/password pair and return the matching record.
    async fn authenticate(&self, email: &str, password: &str) -> Result<IdentityUser>;

    /// Complete a federated sign-in with the named external provider
    /// (e.g. `"google"`), returning the linked identity record.
    async fn federated_sign_in(&self, provider: &str) -> Result<IdentityUser>;

    /// Trigger an out-of-band password reset for `email`.
    ///
    /// Delivery is asynchronous and unverified; success only means the
    /// provider accepted the request.
    async fn send_password_reset(&self, email: &str) -> Result<()>;

    /// Merge `patch` into the metadata bag of `user_id` and return the
    /// updated record. Entries present in `patch` replace existing entries
    /// of the same name; all others are preserved.
    async fn update_metadata(&self, user_id: &str, patch: Document) -> Result<IdentityUser>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_str_reads_bag() {
        let mut metadata = Document::new();
        metadata.insert("displayName".to_string(), json!("Ana"));
        metadata.insert("age".to_string(), json!(30));

        let user = IdentityUser {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            metadata,
        };

        assert_eq!(user.metadata_str("displayName"), Some("Ana"));
        assert_eq!(user.metadata_str("age"), None);
        assert_eq!(user.metadata_str("missing"), None);
    }

    #[test]
    fn identity_user_deserializes_without_metadata() {
        let user: IdentityUser =
            serde_json::from_value(json!({ "id": "u1", "email": "a@x.com" })).unwrap();
        assert!(user.metadata.is_empty());
    }
}
