//! Site identity resolution.
//!
//! Resolves the site's base URL from an ordered chain of signals:
//!
//! 1. Explicit override (`[base.url]` / `--base-url` / `BASE_URL`)
//! 2. A `CNAME` marker file at the tree root (GitHub Pages custom domain)
//! 3. Repository name ending in `.github.io` (user/organization site)
//! 4. `https://<owner>.github.io/<name>` (project site convention)
//!
//! The first non-empty signal wins. Callers choose between the strict
//! flavor ([`require_base_url`], fatal when nothing resolves, used by the
//! canonical pass which must never stamp pages with a guessed domain) and
//! the lenient flavor ([`base_url_or_default`], silent hard fallback,
//! used by the sitemap and RSS emitters).

use crate::config::{ConfigError, SiteConfig};
use anyhow::Result;
use std::{fs, path::Path};

/// Hard fallback for emitters when no signal resolves.
pub const DEFAULT_BASE_URL: &str = "https://example.github.io";

/// Repository name suffix marking a user/organization Pages site.
const USER_SITE_SUFFIX: &str = ".github.io";

/// Marker file holding the custom domain, one hostname per line.
const CNAME_FILE: &str = "CNAME";

/// Resolve the base URL, failing when no signal applies.
pub fn require_base_url(config: &SiteConfig) -> Result<String> {
    detect_base_url(config).ok_or_else(|| ConfigError::BaseUrl.into())
}

/// Resolve the base URL, falling back to [`DEFAULT_BASE_URL`].
pub fn base_url_or_default(config: &SiteConfig) -> String {
    detect_base_url(config).unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Walk the signal chain; `None` when nothing resolves.
fn detect_base_url(config: &SiteConfig) -> Option<String> {
    // 1) Explicit override, used verbatim (scheme defaulted)
    if let Some(url) = &config.base.url {
        let url = url.trim();
        if !url.is_empty() {
            return Some(with_scheme(url));
        }
    }

    // 2) CNAME at the tree root
    if let Some(domain) = read_cname(config.get_root()) {
        return Some(with_scheme(&domain));
    }

    // 3) + 4) Repository conventions
    if let Some(repo) = &config.base.repository
        && let Some((owner, name)) = repo.split_once('/')
    {
        if name.ends_with(USER_SITE_SUFFIX) {
            return Some(format!("https://{name}"));
        }
        if !owner.is_empty() && !name.is_empty() {
            return Some(format!("https://{owner}.github.io/{name}"));
        }
    }

    None
}

/// First non-empty line of the CNAME marker file, if any.
fn read_cname(root: &Path) -> Option<String> {
    let content = fs::read_to_string(root.join(CNAME_FILE)).ok()?;
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
}

/// Default a missing scheme to https and drop any trailing slash.
fn with_scheme(s: &str) -> String {
    let s = s.trim_end_matches('/');
    if s.starts_with("http") {
        s.to_string()
    } else {
        format!("https://{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.scan.root = Some(root.to_path_buf());
        config
    }

    #[test]
    fn test_explicit_override_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CNAME"), "ignored.example.com\n").unwrap();

        let mut config = config_at(dir.path());
        config.base.url = Some("https://override.example.com".into());
        config.base.repository = Some("acme/widgets".into());

        assert_eq!(
            require_base_url(&config).unwrap(),
            "https://override.example.com"
        );
    }

    #[test]
    fn test_override_scheme_defaulted() {
        let config = {
            let mut c = SiteConfig::default();
            c.base.url = Some("guides.acme.com/".into());
            c
        };
        assert_eq!(require_base_url(&config).unwrap(), "https://guides.acme.com");
    }

    #[test]
    fn test_cname_first_non_empty_line() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CNAME"), "\n\n  guides.acme.com  \nother\n").unwrap();

        let config = config_at(dir.path());
        assert_eq!(require_base_url(&config).unwrap(), "https://guides.acme.com");
    }

    #[test]
    fn test_cname_with_scheme_kept() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CNAME"), "http://legacy.acme.com\n").unwrap();

        let config = config_at(dir.path());
        assert_eq!(require_base_url(&config).unwrap(), "http://legacy.acme.com");
    }

    #[test]
    fn test_user_site_repository() {
        let dir = TempDir::new().unwrap();
        let mut config = config_at(dir.path());
        config.base.repository = Some("acme/acme.github.io".into());

        assert_eq!(require_base_url(&config).unwrap(), "https://acme.github.io");
    }

    #[test]
    fn test_project_site_repository() {
        let dir = TempDir::new().unwrap();
        let mut config = config_at(dir.path());
        config.base.repository = Some("acme/widgets".into());

        assert_eq!(
            require_base_url(&config).unwrap(),
            "https://acme.github.io/widgets"
        );
    }

    #[test]
    fn test_repository_without_slash_is_no_signal() {
        let dir = TempDir::new().unwrap();
        let mut config = config_at(dir.path());
        config.base.repository = Some("acme".into());

        assert!(require_base_url(&config).is_err());
    }

    #[test]
    fn test_no_signal_is_fatal_for_strict_flavor() {
        let dir = TempDir::new().unwrap();
        let config = config_at(dir.path());

        let err = require_base_url(&config).unwrap_err().to_string();
        assert!(err.contains("BASE_URL"));
    }

    #[test]
    fn test_no_signal_falls_back_for_lenient_flavor() {
        let dir = TempDir::new().unwrap();
        let config = config_at(dir.path());

        assert_eq!(base_url_or_default(&config), DEFAULT_BASE_URL);
    }
}
