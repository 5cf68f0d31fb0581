//! Feature flag gating.
//!
//! The scan pipeline is gated on a remotely-managed flag. Lookups never
//! fail loudly: any error resolves to "disabled" so a flag-service outage
//! degrades to the feature being unavailable.

mod flagsmith;

pub use flagsmith::FlagsmithFlags;

use std::collections::HashMap;

use async_trait::async_trait;

/// Flag gating the LLM-backed analysis pipeline.
pub const LLM_SERVICE_FLAG: &str = "llm_service_enabled";

/// Collaborator answering feature flag queries.
#[async_trait]
pub trait FeatureFlags: Send + Sync {
    /// Whether `flag_id` is enabled. Unknown flags and lookup failures are
    /// both reported as disabled.
    async fn is_enabled(&self, flag_id: &str) -> bool;
}

/// In-memory [`FeatureFlags`] driven by an explicit map.
///
/// Used for config-pinned deployments and as the default when no remote
/// backend is configured.
pub struct FixedFlags {
    flags: HashMap<String, bool>,
}

impl FixedFlags {
    pub fn new(flags: HashMap<String, bool>) -> Self {
        Self { flags }
    }

    /// All flags disabled.
    pub fn disabled() -> Self {
        Self::new(HashMap::new())
    }
}

#[async_trait]
impl FeatureFlags for FixedFlags {
    async fn is_enabled(&self, flag_id: &str) -> bool {
        self.flags.get(flag_id).copied().unwrap_or(false)
    }
}
