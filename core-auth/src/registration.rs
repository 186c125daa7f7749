//! Register-user collaborator client.
//!
//! After a successful sign-up the application's backend keeps its own user
//! document; an external endpoint owns that write. The call is
//! fire-and-forget: it is spawned off the sign-up path and its failure is
//! logged, never surfaced to the caller.

use crate::error::{AuthError, Result};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Body posted to the register-user endpoint.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewUserRegistration {
    pub id: String,
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub role: String,
}

/// Client for the external register-user endpoint.
#[derive(Clone)]
pub struct RegistrationClient {
    endpoint: Url,
    http: Arc<dyn HttpClient>,
}

impl RegistrationClient {
    /// Create a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Fails with [`AuthError::InvalidEndpoint`] when `endpoint` is not an
    /// absolute URL.
    pub fn new(endpoint: &str, http: Arc<dyn HttpClient>) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| AuthError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        Ok(Self { endpoint, http })
    }

    /// Notify the collaborator about `registration` without blocking the
    /// caller. Failures are logged and dropped.
    pub fn spawn_register(&self, registration: NewUserRegistration) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(err) = client.register(&registration).await {
                warn!(
                    user_id = %registration.id,
                    error = %err,
                    "Register-user collaborator call failed"
                );
            }
        });
    }

    /// Perform the registration call and report its outcome.
    pub async fn register(&self, registration: &NewUserRegistration) -> Result<()> {
        let request =
            HttpRequest::new(HttpMethod::Post, self.endpoint.as_str()).json(registration)?;

        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(AuthError::Provider(
                bridge_traits::BridgeError::OperationFailed(format!(
                    "register-user endpoint answered HTTP {}",
                    response.status
                )),
            ));
        }

        debug!(user_id = %registration.id, "Register-user collaborator notified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_memory::RecordingHttpClient;

    fn registration() -> NewUserRegistration {
        NewUserRegistration {
            id: "u1".to_string(),
            email: "a@x.com".to_string(),
            display_name: "Ana".to_string(),
            role: "user".to_string(),
        }
    }

    #[test]
    fn relative_endpoint_is_rejected() {
        let http = Arc::new(RecordingHttpClient::new());
        let result = RegistrationClient::new("/api/users/create", http);
        assert!(matches!(result, Err(AuthError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn register_posts_expected_body() {
        let http = Arc::new(RecordingHttpClient::new());
        let client =
            RegistrationClient::new("https://api.example.com/users/create", http.clone()).unwrap();

        client.register(&registration()).await.unwrap();

        let requests = http.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://api.example.com/users/create");

        let body: serde_json::Value =
            serde_json::from_slice(requests[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["id"], "u1");
        assert_eq!(body["displayName"], "Ana");
        assert_eq!(body["role"], "user");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let http = Arc::new(RecordingHttpClient::new());
        http.respond_with_status(500).await;
        let client =
            RegistrationClient::new("https://api.example.com/users/create", http).unwrap();

        let result = client.register(&registration()).await;
        assert!(result.is_err());
    }
}
