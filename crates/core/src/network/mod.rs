//! Declarative HTTP request layer.
//!
//! Outbound calls are described by [`RequestData`] values, turned into wire
//! requests by [`build_request`], and executed by an [`HttpClient`]. Building
//! never touches the network; the transport issues each request exactly once
//! and leaves body interpretation to the caller.

mod client;
mod request;

pub use client::{HttpClient, ReqwestHttpClient};
pub use request::{build_request, RequestData, RequestMethod};

use thiserror::Error;

/// Errors that can occur while building or executing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The descriptor could not be turned into a valid wire request.
    #[error("error in creating the request object")]
    InvalidRequest,

    /// No response was received from the remote.
    #[error("error in receiving response from remote")]
    FailedToGetResponse,

    /// A response was received but its status code denotes failure.
    #[error("got a non-success response code from remote: {status}")]
    ErrorResponse { status: u16 },

    /// The response body could not be decoded into the expected structure.
    #[error("failed to decode response body")]
    Decode,
}
