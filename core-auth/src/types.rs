use bridge_traits::document::Document;
use bridge_traits::identity::IdentityUser;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata-bag key holding the user's display name.
pub const METADATA_DISPLAY_NAME: &str = "displayName";
/// Metadata-bag key holding the user's role.
pub const METADATA_ROLE: &str = "role";

/// The user record the auth surface hands to callers.
///
/// Owned by the identity provider; the gateway only reads it and patches the
/// metadata bag.
pub type UserRecord = IdentityUser;

/// Session carried by the adapter while a user is signed in.
///
/// Created on successful sign-in/sign-up, replaced on every identity
/// transition, dropped on sign-out. The gateway holds at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserRecord,
}

/// Kind of identity transition delivered to state-change watchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeKind {
    /// Fired once on registration with the state at that moment.
    InitialSession,
    SignedIn,
    SignedOut,
    UserUpdated,
}

impl AuthChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthChangeKind::InitialSession => "INITIAL_SESSION",
            AuthChangeKind::SignedIn => "SIGNED_IN",
            AuthChangeKind::SignedOut => "SIGNED_OUT",
            AuthChangeKind::UserUpdated => "USER_UPDATED",
        }
    }
}

impl fmt::Display for AuthChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile seed supplied at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSeed {
    /// Patched onto the identity record before sign-up settles, when set.
    pub display_name: Option<String>,
    /// Forwarded to the register-user collaborator; defaults to the
    /// configured role when absent.
    pub role: Option<String>,
}

/// Parameters for [`AuthGateway::sign_up`](crate::AuthGateway::sign_up).
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpParams {
    pub email: String,
    pub password: String,
    pub profile: Option<ProfileSeed>,
}

/// Email/password pair for
/// [`AuthGateway::sign_in_with_password`](crate::AuthGateway::sign_in_with_password).
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Parameters for [`AuthGateway::update_user`](crate::AuthGateway::update_user).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateUserParams {
    /// Entries merged into the profile metadata bag.
    pub data: Document,
}

/// `{ user }` payload settled by sign-up, sign-in, and update-user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: UserRecord,
}

/// `{ user }` payload settled by `get_user`; `null` while signed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub user: Option<UserRecord>,
}

/// `{ session }` payload settled by `get_session`; `null` while signed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn change_kind_wire_names() {
        assert_eq!(AuthChangeKind::SignedIn.as_str(), "SIGNED_IN");
        assert_eq!(AuthChangeKind::InitialSession.to_string(), "INITIAL_SESSION");
        assert_eq!(
            serde_json::to_value(AuthChangeKind::SignedOut).unwrap(),
            json!("SIGNED_OUT")
        );
    }

    #[test]
    fn session_payload_serializes_null_when_signed_out() {
        let payload = SessionPayload { session: None };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "session": null })
        );
    }
}
