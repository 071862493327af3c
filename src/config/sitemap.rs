//! `[sitemap]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[sitemap]` section in sitefix.toml.
///
/// # Example
/// ```toml
/// [sitemap]
/// max_urls = 49000
/// robots = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Maximum URLs per sitemap file; above this the sitemap is
    /// partitioned and an index file is written.
    #[serde(default = "defaults::sitemap::max_urls")]
    #[educe(Default = defaults::sitemap::max_urls())]
    pub max_urls: usize,

    /// Create or update robots.txt with a `Sitemap:` directive.
    #[serde(default)]
    pub robots: bool,
}
