use super::{
    types::{Config, FlagsBackend},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Analysis API key is present
/// - Flagsmith backend has an environment key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.analysis.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "analysis.api_key cannot be empty".to_string(),
        ));
    }

    if config.flags.backend == FlagsBackend::Flagsmith {
        match &config.flags.flagsmith {
            Some(flagsmith) if !flagsmith.environment_key.is_empty() => {}
            _ => {
                return Err(ConfigError::ValidationError(
                    "flags.flagsmith.environment_key is required when flags.backend = \"flagsmith\""
                        .to_string(),
                ));
            }
        }
    }

    Ok(())
}
