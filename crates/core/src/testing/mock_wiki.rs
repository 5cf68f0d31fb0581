//! Mock wiki service for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::network::ApiError;
use crate::wiki::{WikiError, WikiService, WikiSummary};

/// Mock implementation of the [`WikiService`] trait.
///
/// Names added via [`MockWikiService::add_summary`] resolve; names marked
/// with [`MockWikiService::fail_with_network`] fail with a transport error;
/// everything else fails with `NotFound`. All lookups are recorded for
/// assertions.
pub struct MockWikiService {
    summaries: Arc<RwLock<HashMap<String, WikiSummary>>>,
    network_failures: Arc<RwLock<HashSet<String>>>,
    lookups: Arc<RwLock<Vec<String>>>,
}

impl Default for MockWikiService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWikiService {
    pub fn new() -> Self {
        Self {
            summaries: Arc::new(RwLock::new(HashMap::new())),
            network_failures: Arc::new(RwLock::new(HashSet::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register a summary for a scientific name.
    pub async fn add_summary(&self, scientific_name: &str, summary: WikiSummary) {
        self.summaries
            .write()
            .await
            .insert(scientific_name.to_string(), summary);
    }

    /// Make lookups for a scientific name fail with a network error.
    pub async fn fail_with_network(&self, scientific_name: &str) {
        self.network_failures
            .write()
            .await
            .insert(scientific_name.to_string());
    }

    /// All recorded lookups, in call order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    /// Number of lookups performed.
    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }
}

#[async_trait]
impl WikiService for MockWikiService {
    async fn summary(&self, scientific_name: &str) -> Result<WikiSummary, WikiError> {
        self.lookups.write().await.push(scientific_name.to_string());

        if self.network_failures.read().await.contains(scientific_name) {
            return Err(WikiError::Network(ApiError::FailedToGetResponse));
        }

        match self.summaries.read().await.get(scientific_name) {
            Some(summary) => Ok(summary.clone()),
            None => Err(WikiError::NotFound(scientific_name.to_string())),
        }
    }
}
