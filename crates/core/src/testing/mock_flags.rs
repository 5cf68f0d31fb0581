//! Mock feature flags for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::flags::{FeatureFlags, LLM_SERVICE_FLAG};

/// Mock implementation of the [`FeatureFlags`] trait.
///
/// Unknown flags read as disabled, matching the production backends.
/// Queries are recorded for assertions.
pub struct MockFeatureFlags {
    flags: Arc<RwLock<HashMap<String, bool>>>,
    queries: Arc<RwLock<Vec<String>>>,
}

impl Default for MockFeatureFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeatureFlags {
    pub fn new() -> Self {
        Self {
            flags: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A mock with the LLM service flag enabled.
    pub fn llm_enabled() -> Self {
        let mut flags = HashMap::new();
        flags.insert(LLM_SERVICE_FLAG.to_string(), true);
        Self {
            flags: Arc::new(RwLock::new(flags)),
            queries: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Set a flag value.
    pub async fn set_flag(&self, flag_id: &str, enabled: bool) {
        self.flags.write().await.insert(flag_id.to_string(), enabled);
    }

    /// All recorded queries, in call order.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Number of flag queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl FeatureFlags for MockFeatureFlags {
    async fn is_enabled(&self, flag_id: &str) -> bool {
        self.queries.write().await.push(flag_id.to_string());
        self.flags.read().await.get(flag_id).copied().unwrap_or(false)
    }
}
