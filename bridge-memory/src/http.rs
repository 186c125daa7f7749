//! Recording HTTP client for tests.

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// [`HttpClient`] that records every request and replays a configured
/// response, without touching the network.
pub struct RecordingHttpClient {
    requests: Mutex<Vec<HttpRequest>>,
    response_status: Mutex<u16>,
    failure: Mutex<Option<String>>,
}

impl RecordingHttpClient {
    /// A client that answers every request with an empty 200.
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            response_status: Mutex::new(200),
            failure: Mutex::new(None),
        }
    }

    /// Answer subsequent requests with `status`.
    pub async fn respond_with_status(&self, status: u16) {
        *self.response_status.lock().await = status;
    }

    /// Fail subsequent requests at the transport level with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().await = Some(message.into());
    }

    /// All requests seen so far, oldest first.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for RecordingHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry(request, RetryPolicy::no_retry()).await
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        _policy: RetryPolicy,
    ) -> Result<HttpResponse> {
        self.requests.lock().await.push(request);

        if let Some(message) = self.failure.lock().await.clone() {
            return Err(BridgeError::OperationFailed(message));
        }

        Ok(HttpResponse {
            status: *self.response_status.lock().await,
            headers: HashMap::new(),
            body: Bytes::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::HttpMethod;

    #[tokio::test]
    async fn records_requests_and_replays_status() {
        let client = RecordingHttpClient::new();
        let response = client
            .execute(HttpRequest::new(HttpMethod::Post, "https://x/create"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        client.respond_with_status(503).await;
        let response = client
            .execute(HttpRequest::new(HttpMethod::Post, "https://x/create"))
            .await
            .unwrap();
        assert_eq!(response.status, 503);

        let seen = client.requests().await;
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].url, "https://x/create");
    }

    #[tokio::test]
    async fn configured_failure_is_returned() {
        let client = RecordingHttpClient::new();
        client.fail_with("connection refused").await;

        let result = client
            .execute(HttpRequest::new(HttpMethod::Post, "https://x/create"))
            .await;
        assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
    }
}
