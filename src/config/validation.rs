use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::url::parse_http_url;
use crate::ConfigError;
use std::collections::HashSet;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_sites(&config.sites)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 and request_delay >= 0 always hold for unsigned types

    if config.max_threads < 1 || config.max_threads > 100 {
        return Err(ConfigError::Validation(format!(
            "max_threads must be between 1 and 100, got {}",
            config.max_threads
        )));
    }

    if config.max_pages_per_site < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_site must be >= 1, got {}",
            config.max_pages_per_site
        )));
    }

    if config.request_timeout == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be greater than 0ms".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
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

    if let Some(contact) = &config.contact_url {
        url::Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed site list
fn validate_sites(sites: &[String]) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one site must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for site in sites {
        parse_http_url(site)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site '{}': {}", site, e)))?;

        // Sites key the output document, so they must be unique
        if !seen.insert(site.as_str()) {
            return Err(ConfigError::Validation(format!(
                "site '{}' is listed more than once",
                site
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            sites: vec!["https://example.com/".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_default_with_site_is_valid() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_max_threads_bounds() {
        let mut config = valid_config();
        config.crawler.max_threads = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_threads = 101;
        assert!(validate(&config).is_err());

        config.crawler.max_threads = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_page_budget() {
        let mut config = valid_config();
        config.crawler.max_pages_per_site = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_depth_and_delay_are_allowed() {
        let mut config = valid_config();
        config.crawler.max_depth = 0;
        config.crawler.request_delay = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = valid_config();
        config.crawler.request_timeout = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = valid_config();
        config.user_agent.crawler_name = "Bad Name".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = "Good-Name2".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_contact_url() {
        let mut config = valid_config();
        config.user_agent.contact_url = Some("not a url".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_sites() {
        assert!(validate_sites(&[]).is_err());
        assert!(validate_sites(&["ftp://example.com/".to_string()]).is_err());
        assert!(validate_sites(&["/relative/path".to_string()]).is_err());
        assert!(validate_sites(&["http://example.com".to_string()]).is_ok());
    }

    #[test]
    fn test_duplicate_sites_rejected() {
        let sites = vec![
            "https://example.com/".to_string(),
            "https://example.com/".to_string(),
        ];
        assert!(validate_sites(&sites).is_err());

        // Trailing-slash variants are different seeds
        let sites = vec![
            "https://example.com".to_string(),
            "https://example.com/".to_string(),
        ];
        assert!(validate_sites(&sites).is_ok());
    }

    #[test]
    fn test_validate_output_path() {
        let mut config = valid_config();
        config.output.path = "  ".to_string();
        assert!(validate(&config).is_err());

        let mut config = valid_config();
        config.output.summary_path = Some(String::new());
        assert!(validate(&config).is_err());
    }
}
