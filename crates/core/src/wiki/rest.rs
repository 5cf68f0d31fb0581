//! Wikipedia REST API client.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::network::{ApiError, HttpClient, RequestData, RequestMethod};

use super::{WikiError, WikiService, WikiSummary};

const WIKIPEDIA_HOST: &str = "en.wikipedia.org";

/// Descriptor values for the Wikipedia REST API.
enum WikiRequest {
    /// Summary page for one species.
    SpeciesSummary { species: String },
}

impl RequestData for WikiRequest {
    fn method(&self) -> RequestMethod {
        match self {
            WikiRequest::SpeciesSummary { .. } => RequestMethod::Get,
        }
    }

    fn host(&self) -> String {
        match self {
            WikiRequest::SpeciesSummary { .. } => WIKIPEDIA_HOST.to_string(),
        }
    }

    fn end_point(&self) -> String {
        match self {
            WikiRequest::SpeciesSummary { species } => {
                format!("/api/rest_v1/page/summary/{}", urlencoding::encode(species))
            }
        }
    }
}

/// [`WikiService`] backed by the descriptor layer and an [`HttpClient`].
pub struct RestWikiService {
    http_client: Arc<dyn HttpClient>,
}

impl RestWikiService {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl WikiService for RestWikiService {
    async fn summary(&self, scientific_name: &str) -> Result<WikiSummary, WikiError> {
        let request = WikiRequest::SpeciesSummary {
            species: scientific_name.to_string(),
        };

        debug!(species = scientific_name, "fetching wiki summary");

        let data = self
            .http_client
            .http_data(&request)
            .await
            .map_err(|e| match e {
                ApiError::ErrorResponse { status: 404 } => {
                    WikiError::NotFound(scientific_name.to_string())
                }
                other => WikiError::Network(other),
            })?;

        serde_json::from_slice(&data).map_err(|e| WikiError::Decode(e.to_string()))
    }
}
