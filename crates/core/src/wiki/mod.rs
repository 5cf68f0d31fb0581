//! Encyclopedia enrichment for candidate species.
//!
//! One summary lookup per scientific name against the Wikipedia REST API.
//! Callers treat any error as "this candidate yields no record"; a failed
//! lookup never fails a whole scan.

mod rest;
mod types;

pub use rest::RestWikiService;
pub use types::{WikiContentUrls, WikiImage, WikiReference, WikiSummary};

use async_trait::async_trait;
use thiserror::Error;

use crate::network::ApiError;

/// Errors that can occur during a summary lookup.
#[derive(Debug, Error)]
pub enum WikiError {
    /// No summary page exists for the requested name.
    #[error("no summary page for {0}")]
    NotFound(String),

    /// Request building or transport failed.
    #[error("summary request failed: {0}")]
    Network(ApiError),

    /// The response body could not be decoded into a summary.
    #[error("failed to decode summary response: {0}")]
    Decode(String),
}

/// Collaborator that fetches one encyclopedia summary per species.
#[async_trait]
pub trait WikiService: Send + Sync {
    /// Fetch the summary page for a scientific name.
    async fn summary(&self, scientific_name: &str) -> Result<WikiSummary, WikiError>;
}
