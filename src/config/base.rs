//! `[base]` section configuration.
//!
//! Site identity: title, description, base URL override and the repository
//! identifier used for the GitHub Pages URL conventions.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in sitefix.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Acme Guides"
/// description = "Setup guides and howtos"
/// url = "https://guides.acme.com"
/// repository = "acme/guides"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title used as the RSS channel title.
    #[serde(default)]
    pub title: String,

    /// Site description used as the RSS channel description.
    #[serde(default)]
    pub description: String,

    /// Explicit base URL override (scheme + host, no trailing slash).
    /// When set it wins over CNAME and repository detection.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// Repository identifier in `owner/name` form.
    #[serde(default = "defaults::base::repository")]
    #[educe(Default = defaults::base::repository())]
    pub repository: Option<String>,

    /// BCP 47 language code for the RSS channel (e.g., "en", "ru-RU").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Acme Guides"
            description = "Setup guides"
            url = "https://guides.acme.com"
            repository = "acme/guides"
            language = "en-US"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Acme Guides");
        assert_eq!(config.base.description, "Setup guides");
        assert_eq!(config.base.url, Some("https://guides.acme.com".to_string()));
        assert_eq!(config.base.repository, Some("acme/guides".to_string()));
        assert_eq!(config.base.language, "en-US");
    }

    #[test]
    fn test_base_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.url, None);
        assert_eq!(config.base.repository, None);
        assert_eq!(config.base.language, "en");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test site"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }
}
