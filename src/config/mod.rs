//! Site configuration management for `sitefix.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `[base]`     | Site metadata (title, url, repository)          |
//! | `[scan]`     | Crawl root and excluded directories             |
//! | `[sitemap]`  | Per-file URL cap, robots.txt directive          |
//! | `[rss]`      | Feed output path and item cap                   |
//! | `[tracking]` | Tracking counter identifier                     |
//!
//! The file is optional: every field has a default, and CLI flags (each
//! with an environment variable binding) override the file.
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Acme Guides"
//! description = "Setup guides and howtos"
//! repository = "acme/guides"
//!
//! [sitemap]
//! max_urls = 49000
//! robots = true
//!
//! [tracking]
//! id = "103602117"
//! ```

mod base;
pub mod defaults;
mod error;
mod rss;
mod scan;
mod sitemap;
mod tracking;

pub use error::ConfigError;

use base::BaseConfig;
use rss::RssConfig;
use scan::ScanConfig;
use sitemap::SitemapConfig;
use tracking::TrackingConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing sitefix.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Crawl scope
    #[serde(default)]
    pub scan: ScanConfig,

    /// Sitemap generation settings
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// RSS generation settings
    #[serde(default)]
    pub rss: RssConfig,

    /// Tracking counter settings
    #[serde(default)]
    pub tracking: TrackingConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the site tree root
    pub fn get_root(&self) -> &Path {
        self.scan.root.as_deref().unwrap_or(Path::new("."))
    }

    /// Get CLI arguments reference
    pub fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .clone()
            .or_else(|| self.scan.root.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        let root = Self::normalize_path(&root);
        self.config_path = root.join(&cli.config);
        self.scan.root = Some(root);

        if let Some(url) = &cli.base_url {
            self.base.url = Some(url.clone());
        }
        if let Some(repo) = &cli.repository {
            self.base.repository = Some(repo.clone());
        }

        match &cli.command {
            Commands::Sitemap { max_urls, robots } => {
                Self::update_option(&mut self.sitemap.max_urls, max_urls.as_ref());
                Self::update_option(&mut self.sitemap.robots, robots.as_ref());
            }
            Commands::Rss {
                max_items,
                title,
                description,
            } => {
                Self::update_option(&mut self.rss.max_items, max_items.as_ref());
                Self::update_option(&mut self.base.title, title.as_ref());
                Self::update_option(&mut self.base.description, description.as_ref());
            }
            Commands::Track { id, .. } => {
                if let Some(id) = id {
                    self.tracking.id = Some(id.clone());
                }
            }
            Commands::Canonical { .. } => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base.url
            && base_url.contains(char::is_whitespace)
        {
            bail!(ConfigError::Validation(
                "[base.url] must be a plain host or an http(s) URL".into()
            ));
        }

        if let Some(repo) = &self.base.repository
            && !repo.is_empty()
            && !repo.contains('/')
        {
            bail!(ConfigError::Validation(
                "[base.repository] must be in `owner/name` form".into()
            ));
        }

        if self.sitemap.max_urls == 0 {
            bail!(ConfigError::Validation(
                "[sitemap.max_urls] must be at least 1".into()
            ));
        }

        if !self.get_root().exists() {
            bail!(ConfigError::Validation(format!(
                "site root not found: {}",
                self.get_root().display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let config_str = r#"
            [base]
            title = "Acme Guides"
            description = "A test site"
        "#;
        let result = SiteConfig::from_str(config_str);

        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.base.title, "Acme Guides");
        assert_eq!(config.sitemap.max_urls, 49_000);
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let invalid_config = r#"
            [base
            title = "Acme"
        "#;
        let result = SiteConfig::from_str(invalid_config);

        assert!(result.is_err());
    }

    #[test]
    fn test_get_root_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("."));
    }

    #[test]
    fn test_validate_bad_repository() {
        let mut config = SiteConfig::default();
        config.scan.root = Some(PathBuf::from("."));
        config.base.repository = Some("just-a-name".into());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("owner/name"));
    }

    #[test]
    fn test_validate_zero_max_urls() {
        let mut config = SiteConfig::default();
        config.scan.root = Some(PathBuf::from("."));
        config.sitemap.max_urls = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_missing_root() {
        let mut config = SiteConfig::default();
        config.scan.root = Some(PathBuf::from("/definitely/not/a/path"));

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test"

            [unknown_section]
            field = "value"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }

    #[test]
    fn test_full_config_all_sections() {
        let config = r#"
            [base]
            title = "Acme Guides"
            description = "Setup guides"
            url = "https://guides.acme.com"
            repository = "acme/guides"
            language = "en-US"

            [scan]
            root = "docs"
            exclude_dirs = [".git", "drafts"]

            [sitemap]
            max_urls = 1000
            robots = true

            [rss]
            path = "feed.xml"
            max_items = 20

            [tracking]
            id = "42"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Acme Guides");
        assert_eq!(config.scan.exclude_dirs.len(), 2);
        assert_eq!(config.sitemap.max_urls, 1000);
        assert!(config.sitemap.robots);
        assert_eq!(config.rss.max_items, 20);
        assert_eq!(config.tracking.id, Some("42".to_string()));
    }
}
