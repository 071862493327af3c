//! Canonical link pass.
//!
//! Ensures every page carries exactly one `<link rel="canonical">`
//! pointing at its derived canonical URL. Pre-existing canonical links,
//! correct or not, are removed first. The pass also repairs a known
//! authoring mistake where a robots meta tag carries a URL in its
//! `content` attribute.
//!
//! This pass refuses to guess the site's domain: when the base URL
//! cannot be resolved it fails instead of stamping every page with a
//! placeholder.

use super::{Fallback, RE_HEAD_CLOSE, insert_before_last};
use crate::{
    config::SiteConfig,
    crawl::crawl,
    log,
    site::require_base_url,
    url::ExclusionPolicy,
    utils::{git::NoHistory, html::escape_xml},
};
use anyhow::Result;
use regex::Regex;
use std::{fs, sync::LazyLock};

/// Any canonical link tag, plus one trailing newline so removal and
/// reinsertion round-trip to the same bytes.
static RE_CANONICAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<link[^>]+rel=['"]canonical['"][^>]*>\n?"#).unwrap());

/// Robots meta tag whose content attribute holds a URL instead of
/// directives.
static RE_BROKEN_ROBOTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name=['"]robots['"][^>]+content=['"]https?://[^'"]+['"][^>]*>"#)
        .unwrap()
});

const ROBOTS_META: &str = r#"<meta name="robots" content="index, follow">"#;

/// Rewrite `html` so it carries exactly one canonical link for `url`.
pub fn ensure_canonical(html: &str, url: &str) -> String {
    let html = RE_BROKEN_ROBOTS.replace_all(html, ROBOTS_META);
    let html = RE_CANONICAL_LINK.replace_all(&html, "");
    let tag = format!("<link rel=\"canonical\" href=\"{}\" />\n", escape_xml(url));
    insert_before_last(&html, &tag, &[&RE_HEAD_CLOSE], Fallback::Prepend)
}

/// Run the canonical pass over the whole tree.
pub fn run(config: &'static SiteConfig) -> Result<()> {
    let dry_run = config.get_cli().dry_run();
    let base_url = require_base_url(config)?;
    let policy = ExclusionPolicy::from_config(config);
    let documents = crawl(config.get_root(), &base_url, &policy, &NoHistory)?;

    let mut updated = 0usize;
    let mut excluded = 0usize;
    let mut failed = 0usize;

    for doc in &documents {
        let Some(url) = &doc.url else {
            excluded += 1;
            continue;
        };

        let html = match fs::read_to_string(&doc.path) {
            Ok(html) => html,
            Err(err) => {
                log!("error"; "{}: {err}", doc.rel.display());
                failed += 1;
                continue;
            }
        };

        let rewritten = ensure_canonical(&html, url);
        if rewritten == html {
            continue;
        }

        if !dry_run && let Err(err) = fs::write(&doc.path, &rewritten) {
            log!("error"; "{}: {err}", doc.rel.display());
            failed += 1;
            continue;
        }
        log!("canonical"; "{} -> {url}", doc.rel.display());
        updated += 1;
    }

    let mode = if dry_run { " (dry run)" } else { "" };
    log!(
        "canonical";
        "done{mode}. pages: {}, updated: {updated}, excluded: {excluded}, failed: {failed}",
        documents.len()
    );
    Ok(())
}
