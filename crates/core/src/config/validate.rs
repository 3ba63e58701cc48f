use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Live lookup timeout is not 0
/// - Inter-request delay is shorter than the lookup timeout
/// - Region code and name are not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.sources.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "sources.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Google sleeps this long between pages inside one timed lookup.
    if config.sources.request_delay_ms >= config.sources.timeout_secs.saturating_mul(1000) {
        return Err(ConfigError::ValidationError(format!(
            "sources.request_delay_ms ({}) must be shorter than sources.timeout_secs ({}s)",
            config.sources.request_delay_ms, config.sources.timeout_secs
        )));
    }

    if config.region.code.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "region.code cannot be empty".to_string(),
        ));
    }

    if config.region.name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "region.name cannot be empty".to_string(),
        ));
    }

    Ok(())
}
