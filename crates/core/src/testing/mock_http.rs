//! Mock transport client for testing.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::network::{build_request, ApiError, HttpClient, RequestData};

/// A recorded wire request for test assertions.
///
/// Captured from the actually-built request, so assertions see the same
/// URL, headers and body that would have gone over the wire.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Mock implementation of the [`HttpClient`] trait.
///
/// Builds the real wire request from each descriptor (so invalid
/// descriptors fail exactly like production), records it, then pops the
/// next queued response. An empty queue fails with `FailedToGetResponse`.
pub struct MockHttpClient {
    responses: Arc<RwLock<VecDeque<Result<Vec<u8>, ApiError>>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(VecDeque::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue a successful response body.
    pub async fn push_response(&self, body: impl Into<Vec<u8>>) {
        self.responses.write().await.push_back(Ok(body.into()));
    }

    /// Queue an error outcome.
    pub async fn push_error(&self, error: ApiError) {
        self.responses.write().await.push_back(Err(error));
    }

    /// All recorded requests, in call order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Number of requests performed.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn http_data(&self, request_data: &dyn RequestData) -> Result<Vec<u8>, ApiError> {
        let request = build_request(request_data)?;

        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        self.requests.write().await.push(RecordedRequest {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers,
            body: request
                .body()
                .and_then(|body| body.as_bytes())
                .map(|bytes| bytes.to_vec()),
        });

        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or(Err(ApiError::FailedToGetResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::RequestMethod;

    struct PingRequest;

    impl RequestData for PingRequest {
        fn method(&self) -> RequestMethod {
            RequestMethod::Get
        }

        fn host(&self) -> String {
            "example.com".to_string()
        }

        fn end_point(&self) -> String {
            "/ping".to_string()
        }
    }

    #[tokio::test]
    async fn test_records_built_request() {
        let client = MockHttpClient::new();
        client.push_response(b"pong".to_vec()).await;

        let body = client.http_data(&PingRequest).await.unwrap();
        assert_eq!(body, b"pong");

        let requests = client.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].url, "https://example.com/ping");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_empty_queue_fails_transport() {
        let client = MockHttpClient::new();
        let result = client.http_data(&PingRequest).await;
        assert_eq!(result.unwrap_err(), ApiError::FailedToGetResponse);
    }

    #[tokio::test]
    async fn test_queued_error_is_returned() {
        let client = MockHttpClient::new();
        client
            .push_error(ApiError::ErrorResponse { status: 404 })
            .await;

        let result = client.http_data(&PingRequest).await;
        assert_eq!(result.unwrap_err(), ApiError::ErrorResponse { status: 404 });
    }
}
