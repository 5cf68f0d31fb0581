//! Flagsmith-backed feature flags.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::network::{ApiError, HttpClient, RequestData, RequestMethod};

use super::FeatureFlags;

const DEFAULT_FLAGSMITH_HOST: &str = "edge.api.flagsmith.com";

/// Descriptor for the Flagsmith environment flags endpoint.
///
/// The environment key travels as a custom header; this is the one request
/// in the crate that marks itself auth-required.
struct FlagsRequest {
    host: String,
    environment_key: String,
}

impl RequestData for FlagsRequest {
    fn method(&self) -> RequestMethod {
        RequestMethod::Get
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn end_point(&self) -> String {
        "/api/v1/flags/".to_string()
    }

    fn header(&self) -> Option<Vec<(String, String)>> {
        Some(vec![(
            "X-Environment-Key".to_string(),
            self.environment_key.clone(),
        )])
    }

    fn is_auth_required(&self) -> bool {
        true
    }
}

#[derive(Debug, Deserialize)]
struct FlagsmithFlag {
    feature: FlagsmithFeature,
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct FlagsmithFeature {
    name: String,
}

/// [`FeatureFlags`] backed by the Flagsmith edge API.
pub struct FlagsmithFlags {
    http_client: Arc<dyn HttpClient>,
    environment_key: String,
    host: String,
}

impl FlagsmithFlags {
    pub fn new(http_client: Arc<dyn HttpClient>, environment_key: impl Into<String>) -> Self {
        Self {
            http_client,
            environment_key: environment_key.into(),
            host: DEFAULT_FLAGSMITH_HOST.to_string(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    async fn fetch_flag(&self, flag_id: &str) -> Result<bool, ApiError> {
        let request = FlagsRequest {
            host: self.host.clone(),
            environment_key: self.environment_key.clone(),
        };

        let data = self.http_client.http_data(&request).await?;
        let flags: Vec<FlagsmithFlag> =
            serde_json::from_slice(&data).map_err(|_| ApiError::Decode)?;

        Ok(flags
            .iter()
            .any(|flag| flag.feature.name == flag_id && flag.enabled))
    }
}

#[async_trait]
impl FeatureFlags for FlagsmithFlags {
    async fn is_enabled(&self, flag_id: &str) -> bool {
        match self.fetch_flag(flag_id).await {
            Ok(enabled) => enabled,
            Err(e) => {
                debug!(flag_id, error = %e, "flag lookup failed, treating as disabled");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::build_request;

    #[test]
    fn test_flags_request_descriptor() {
        let request = FlagsRequest {
            host: DEFAULT_FLAGSMITH_HOST.to_string(),
            environment_key: "env-key-123".to_string(),
        };

        assert_eq!(request.method(), RequestMethod::Get);
        assert!(request.is_auth_required());

        let wire = build_request(&request).unwrap();
        assert_eq!(
            wire.url().as_str(),
            "https://edge.api.flagsmith.com/api/v1/flags/"
        );
        assert_eq!(wire.headers()["X-Environment-Key"], "env-key-123");
    }

    #[test]
    fn test_flag_payload_decoding() {
        let json = r#"[
            {"feature": {"name": "llm_service_enabled"}, "enabled": true, "feature_state_value": null},
            {"feature": {"name": "beta_ui"}, "enabled": false, "feature_state_value": null}
        ]"#;

        let flags: Vec<FlagsmithFlag> = serde_json::from_str(json).unwrap();
        assert!(flags
            .iter()
            .any(|f| f.feature.name == "llm_service_enabled" && f.enabled));
        assert!(!flags.iter().any(|f| f.feature.name == "beta_ui" && f.enabled));
    }
}
