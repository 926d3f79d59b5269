use crate::config::types::{Config, CrawlerConfig, ExcludeEntry, PlatformConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent node expansions
const MAX_CONCURRENT_FETCHES: u32 = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_platform_config(&config.platform)?;
    validate_exclude_entries(&config.exclude)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // request_delay_ms = 0 is allowed and turns pacing off

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_CONCURRENT_FETCHES {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_CONCURRENT_FETCHES, config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the target platform
fn validate_platform_config(config: &PlatformConfig) -> Result<(), ConfigError> {
    validate_domain_string(&config.root_domain)?;

    let api_base = Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base: {}", e)))?;

    if api_base.scheme() != "http" && api_base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_base '{}' must use http or https",
            config.api_base
        )));
    }

    Ok(())
}

/// Validates exclusion rules
fn validate_exclude_entries(entries: &[ExcludeEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        if entry.name.is_empty() {
            return Err(ConfigError::Validation(
                "exclude entry name cannot be empty".to_string(),
            ));
        }

        match (&entry.prefix, &entry.contains) {
            (Some(pattern), None) | (None, Some(pattern)) if !pattern.is_empty() => {}
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(format!(
                    "exclude entry '{}' must set only one of prefix or contains",
                    entry.name
                )));
            }
            _ => {
                return Err(ConfigError::Validation(format!(
                    "exclude entry '{}' needs a non-empty prefix or contains pattern",
                    entry.name
                )));
            }
        }
    }

    Ok(())
}

/// Validates a bare domain string
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::Validation(
            "root_domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if domain.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ConfigError::Validation(format!(
            "Domain '{}' must be lowercase",
            domain
        )));
    }

    Ok(())
}
