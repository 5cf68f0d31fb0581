//! Transport client over [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::{build_request, ApiError, RequestData};

/// Default request timeout for the production transport.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A client that executes descriptor-driven requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Build the wire request from `request_data`, issue it exactly once and
    /// return the raw response body. The body is never interpreted here;
    /// decoding is the caller's responsibility.
    async fn http_data(&self, request_data: &dyn RequestData) -> Result<Vec<u8>, ApiError>;
}

/// Production [`HttpClient`] backed by a shared [`reqwest::Client`].
///
/// No retry logic: every invocation maps to exactly one outbound call.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn http_data(&self, request_data: &dyn RequestData) -> Result<Vec<u8>, ApiError> {
        let request = build_request(request_data)?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|_| ApiError::FailedToGetResponse)?;

        check_status(response.status())?;

        let body = response
            .bytes()
            .await
            .map_err(|_| ApiError::FailedToGetResponse)?;
        Ok(body.to_vec())
    }
}

/// Classify a received status code. 2xx is success, everything else is an
/// error response regardless of body content.
fn check_status(status: StatusCode) -> Result<(), ApiError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::ErrorResponse {
            status: status.as_u16(),
        })
    }
}
