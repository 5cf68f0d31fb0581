use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub flags: FlagsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("spoor.db")
}

/// Outbound HTTP transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u32 {
    30
}

/// Analysis service (Gemini) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model name (default: gemini-2.0-flash)
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL override (useful for testing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Feature flag configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlagsConfig {
    /// Flag backend type
    pub backend: FlagsBackend,
    /// Flagsmith-specific configuration (required when backend = "flagsmith")
    #[serde(default)]
    pub flagsmith: Option<FlagsmithConfig>,
    /// Explicit flag values (used when backend = "fixed")
    #[serde(default)]
    pub fixed: Option<HashMap<String, bool>>,
}

/// Available feature flag backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlagsBackend {
    Flagsmith,
    Fixed,
}

/// Flagsmith backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FlagsmithConfig {
    /// Flagsmith environment key
    pub environment_key: String,
    /// Edge API host (default: edge.api.flagsmith.com)
    #[serde(default = "default_flagsmith_host")]
    pub host: String,
}

fn default_flagsmith_host() -> String {
    "edge.api.flagsmith.com".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub analysis: SanitizedAnalysisConfig,
    pub flags: SanitizedFlagsConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub http: HttpConfig,
}

/// Sanitized analysis config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAnalysisConfig {
    pub model: String,
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Sanitized flags config (environment key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFlagsConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagsmith: Option<SanitizedFlagsmithConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFlagsmithConfig {
    pub host: String,
    pub environment_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            analysis: SanitizedAnalysisConfig {
                model: config.analysis.model.clone(),
                api_key_configured: !config.analysis.api_key.is_empty(),
                api_base: config.analysis.api_base.clone(),
            },
            flags: SanitizedFlagsConfig {
                backend: match config.flags.backend {
                    FlagsBackend::Flagsmith => "flagsmith".to_string(),
                    FlagsBackend::Fixed => "fixed".to_string(),
                },
                flagsmith: config
                    .flags
                    .flagsmith
                    .as_ref()
                    .map(|f| SanitizedFlagsmithConfig {
                        host: f.host.clone(),
                        environment_key_configured: !f.environment_key.is_empty(),
                    }),
                fixed: config.flags.fixed.clone(),
            },
            server: config.server.clone(),
            database: config.database.clone(),
            http: config.http.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
[analysis]
api_key = "test-key"

[flags]
backend = "fixed"

[flags.fixed]
llm_service_enabled = true
"#
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.analysis.api_key, "test-key");
        assert_eq!(config.analysis.model, "gemini-2.0-flash");
        assert_eq!(config.flags.backend, FlagsBackend::Fixed);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "spoor.db");
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_deserialize_missing_analysis_fails() {
        let toml = r#"
[flags]
backend = "fixed"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_flagsmith_backend() {
        let toml = r#"
[analysis]
api_key = "k"

[flags]
backend = "flagsmith"

[flags.flagsmith]
environment_key = "env-123"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.flags.backend, FlagsBackend::Flagsmith);

        let flagsmith = config.flags.flagsmith.as_ref().unwrap();
        assert_eq!(flagsmith.environment_key, "env-123");
        assert_eq!(flagsmith.host, "edge.api.flagsmith.com");
    }

    #[test]
    fn test_sanitized_config_redacts_secrets() {
        let toml = r#"
[analysis]
api_key = "secret-key"

[flags]
backend = "flagsmith"

[flags.flagsmith]
environment_key = "secret-env"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);

        assert!(sanitized.analysis.api_key_configured);
        assert_eq!(sanitized.flags.backend, "flagsmith");
        let flagsmith = sanitized.flags.flagsmith.as_ref().unwrap();
        assert!(flagsmith.environment_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
        assert!(!json.contains("secret-env"));
    }

    #[test]
    fn test_custom_database_path() {
        let toml = r#"
[analysis]
api_key = "k"

[flags]
backend = "fixed"

[database]
path = "/data/scans.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/scans.sqlite");
    }
}
