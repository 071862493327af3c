//! `[rss]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[rss]` section in sitefix.toml.
///
/// # Example
/// ```toml
/// [rss]
/// path = "rss.xml"
/// max_items = 50
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RssConfig {
    /// Output file name, resolved under the site root.
    #[serde(default = "defaults::rss::path")]
    #[educe(Default = defaults::rss::path())]
    pub path: PathBuf,

    /// Maximum number of feed items (0 = no limit).
    #[serde(default = "defaults::rss::max_items")]
    #[educe(Default = defaults::rss::max_items())]
    pub max_items: usize,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use std::path::PathBuf;

    #[test]
    fn test_rss_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.rss.path, PathBuf::from("rss.xml"));
        assert_eq!(config.rss.max_items, 0);
    }

    #[test]
    fn test_rss_custom() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [rss]
            path = "feed.xml"
            max_items = 25
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.rss.path, PathBuf::from("feed.xml"));
        assert_eq!(config.rss.max_items, 25);
    }
}
