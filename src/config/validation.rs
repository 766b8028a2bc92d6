use crate::config::types::{Config, HttpConfig, IptEntry};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_ipts(config)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    if config.connect_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be blank when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the IPT table
fn validate_ipts(config: &Config) -> Result<(), ConfigError> {
    if config.ipts.is_empty() {
        return Err(ConfigError::Validation(
            "At least one [ipts.<alias>] entry is required".to_string(),
        ));
    }

    // The empty alias is ignored by the crawl, so its url is never checked
    for (alias, entry) in config.ipts.iter().filter(|(alias, _)| !alias.is_empty()) {
        validate_ipt_entry(alias, entry)?;
    }

    Ok(())
}

/// Validates a single IPT entry
fn validate_ipt_entry(alias: &str, entry: &IptEntry) -> Result<(), ConfigError> {
    let url = Url::parse(&entry.url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid url for IPT '{}': {}", alias, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "IPT '{}' url '{}' must use HTTP or HTTPS",
            alias, entry.url
        )));
    }

    Ok(())
}
