//! Canonical URL derivation and crawl exclusion rules.
//!
//! A page's canonical URL is a pure function of its path relative to the
//! site root and the base URL: path separators become `/`, a final
//! `index.html` segment collapses to the enclosing directory URL, and
//! runs of slashes collapse to one. Infrastructure pages (error pages,
//! verification stubs, feeds) get no canonical URL at all.

use crate::config::SiteConfig;
use regex::Regex;
use std::{
    collections::HashSet,
    path::{Component, Path},
    sync::LazyLock,
};

/// Well-known files that never enter sitemaps or feeds.
static RE_EXCLUDED_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^404\.html$
        | ^cname$
        | ^robots\.txt$
        | ^sitemap(-\d+)?\.xml$
        | ^sitemap_index\.xml$
        | ^rss\.xml$
        | ^feed\.xml$
        | ^atom\.xml$
        | ^google[0-9a-zA-Z]+\.html$
        | ^yandex_[0-9a-zA-Z]+\.html$
        ",
    )
    .unwrap()
});

/// Directory and file exclusion rules shared by every pass.
#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    dirs: HashSet<String>,
}

impl ExclusionPolicy {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            dirs: config.scan.exclude_dirs.iter().cloned().collect(),
        }
    }

    /// Whole directory subtrees pruned from the crawl.
    pub fn skips_dir(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    /// Infrastructure files that never claim a canonical URL and never
    /// enter sitemaps or feeds.
    pub fn skips_file(&self, name: &str) -> bool {
        RE_EXCLUDED_FILE.is_match(name)
    }
}

/// Derive the canonical URL for a page at `rel` under `base_url`.
///
/// Returns `None` for pages excluded by `policy`. The result has a scheme
/// and host from `base_url`, forward slashes only, and no doubled slashes.
pub fn canonicalize(rel: &Path, base_url: &str, policy: &ExclusionPolicy) -> Option<String> {
    let name = rel.file_name()?.to_str()?;
    if policy.skips_file(name) {
        return None;
    }

    let mut segments: Vec<&str> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    // A directory index is addressed by its directory URL
    let dir_index = segments.last() == Some(&"index.html");
    if dir_index {
        segments.pop();
    }

    let mut path = format!("/{}", segments.join("/"));
    if dir_index && !path.ends_with('/') {
        path.push('/');
    }
    while path.contains("//") {
        path = path.replace("//", "/");
    }

    Some(format!("{}{path}", base_url.trim_end_matches('/')))
}
