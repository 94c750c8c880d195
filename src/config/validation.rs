use crate::config::types::{Config, FieldSpec, ListingConfig, OutputConfig, RendererConfig};
use crate::extract::ExtractionStrategy;
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Upper bound for every configured timeout (one day)
const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_listing_config(&config.listing)?;
    validate_timeout("detail ready-timeout-secs", config.detail.ready_timeout_secs)?;
    validate_renderer_config(&config.renderer)?;
    validate_fields(&config.fields)?;
    validate_output_config(&config.output, &config.fields)?;

    if config.item_limit == Some(0) {
        return Err(ConfigError::Validation(
            "item-limit must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates listing traversal configuration
fn validate_listing_config(config: &ListingConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start-url '{}': {}", config.start_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' must use http or https",
            config.start_url
        )));
    }

    if config.page_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    if config.max_pages <= config.page_start {
        return Err(ConfigError::Validation(format!(
            "max-pages ({}) must be greater than page-start ({})",
            config.max_pages, config.page_start
        )));
    }

    if config.link_selectors.is_empty() {
        return Err(ConfigError::Validation(
            "at least one link selector is required".to_string(),
        ));
    }

    for selector in config.ready_selectors.iter().chain(&config.link_selectors) {
        validate_selector(selector)?;
    }

    validate_timeout("listing ready-timeout-secs", config.ready_timeout_secs)?;

    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be <= {}, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.page_load_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "page-load-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "connect-timeout-secs must be >= 1".to_string(),
        ));
    }

    validate_timeout("page-load-timeout-secs", config.page_load_timeout_secs)?;
    validate_timeout("connect-timeout-secs", config.connect_timeout_secs)?;

    if let Some(agent) = &config.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the field set and every strategy selector
fn validate_fields(fields: &[FieldSpec]) -> Result<(), ConfigError> {
    if fields.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[field]] is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for field in fields {
        if field.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "field name cannot be empty".to_string(),
            ));
        }

        if !names.insert(field.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate field name '{}'",
                field.name
            )));
        }

        if field.strategies.is_empty() {
            return Err(ConfigError::Validation(format!(
                "field '{}' must have at least one strategy",
                field.name
            )));
        }

        for strategy in &field.strategies {
            validate_strategy(strategy)?;
        }
    }

    Ok(())
}

fn validate_strategy(strategy: &ExtractionStrategy) -> Result<(), ConfigError> {
    match strategy {
        ExtractionStrategy::ElementText { selector }
        | ExtractionStrategy::ElementAttribute { selector, .. }
        | ExtractionStrategy::ElementMatching { selector, .. } => validate_selector(selector),
        ExtractionStrategy::RegexNearLabel { labels, .. } => {
            if labels.iter().any(|l| l.trim().is_empty()) {
                return Err(ConfigError::Validation(
                    "near-label entries cannot be blank".to_string(),
                ));
            }
            Ok(())
        }
        ExtractionStrategy::RegexOverPageText { .. } => Ok(()),
    }
}

/// Validates output configuration against the field set
fn validate_output_config(config: &OutputConfig, fields: &[FieldSpec]) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for column in &config.columns {
        if !fields.iter().any(|f| &f.name == column) {
            return Err(ConfigError::Validation(format!(
                "output column '{}' does not name a field",
                column
            )));
        }
        if !seen.insert(column.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate output column '{}'",
                column
            )));
        }
    }

    Ok(())
}

/// Validates that a CSS selector parses
fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{DetailConfig, PolitenessConfig};

    fn create_test_config() -> Config {
        Config {
            item_limit: None,
            listing: ListingConfig {
                start_url: "https://example.com/list".to_string(),
                page_param: "page".to_string(),
                page_start: 0,
                max_pages: 10,
                ready_selectors: vec![".view-content".to_string()],
                link_selectors: vec!["a.item".to_string()],
                link_must_contain: None,
                strip_link_query: false,
                ready_timeout_secs: 1,
                settle_ms: 0,
            },
            detail: DetailConfig::default(),
            politeness: PolitenessConfig::default(),
            renderer: RendererConfig::default(),
            output: OutputConfig::default(),
            fields: vec![FieldSpec {
                name: "Title".to_string(),
                strategies: vec![ExtractionStrategy::ElementText {
                    selector: "h1".to_string(),
                }],
            }],
        }
    }

    fn assert_validation_error(config: &Config) {
        let result = validate(config);
        assert!(result.is_err(), "expected validation to fail");
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_test_config()).is_ok());
    }

    #[test]
    fn test_invalid_start_url() {
        let mut config = create_test_config();
        config.listing.start_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_start_url() {
        let mut config = create_test_config();
        config.listing.start_url = "ftp://example.com/list".to_string();
        assert_validation_error(&config);
    }

    #[test]
    fn test_max_pages_must_exceed_start() {
        let mut config = create_test_config();
        config.listing.page_start = 10;
        config.listing.max_pages = 10;
        assert_validation_error(&config);
    }

    #[test]
    fn test_empty_page_param() {
        let mut config = create_test_config();
        config.listing.page_param = " ".to_string();
        assert_validation_error(&config);
    }

    #[test]
    fn test_invalid_link_selector() {
        let mut config = create_test_config();
        config.listing.link_selectors = vec!["a[href=".to_string()];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_invalid_strategy_selector() {
        let mut config = create_test_config();
        config.fields[0].strategies = vec![ExtractionStrategy::ElementAttribute {
            selector: ">>".to_string(),
            attribute: "href".to_string(),
        }];
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_no_fields() {
        let mut config = create_test_config();
        config.fields.clear();
        assert_validation_error(&config);
    }

    #[test]
    fn test_duplicate_field_names() {
        let mut config = create_test_config();
        let copy = config.fields[0].clone();
        config.fields.push(copy);
        assert_validation_error(&config);
    }

    #[test]
    fn test_field_without_strategies() {
        let mut config = create_test_config();
        config.fields[0].strategies.clear();
        assert_validation_error(&config);
    }

    #[test]
    fn test_unknown_output_column() {
        let mut config = create_test_config();
        config.output.columns = vec!["Missing".to_string()];
        assert_validation_error(&config);
    }

    #[test]
    fn test_duplicate_output_column() {
        let mut config = create_test_config();
        config.output.columns = vec!["Title".to_string(), "Title".to_string()];
        assert_validation_error(&config);
    }

    #[test]
    fn test_zero_item_limit() {
        let mut config = create_test_config();
        config.item_limit = Some(0);
        assert_validation_error(&config);
    }

    #[test]
    fn test_zero_page_load_timeout() {
        let mut config = create_test_config();
        config.renderer.page_load_timeout_secs = 0;
        assert_validation_error(&config);
    }

    #[test]
    fn test_oversized_timeouts_rejected() {
        let mut config = create_test_config();
        config.listing.ready_timeout_secs = i64::MAX as u64;
        assert_validation_error(&config);

        let mut config = create_test_config();
        config.detail.ready_timeout_secs = MAX_TIMEOUT_SECS + 1;
        assert_validation_error(&config);

        let mut config = create_test_config();
        config.renderer.page_load_timeout_secs = u64::MAX;
        assert_validation_error(&config);

        let mut config = create_test_config();
        config.listing.ready_timeout_secs = MAX_TIMEOUT_SECS;
        assert!(validate(&config).is_ok());
    }
}
