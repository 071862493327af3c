//! Sitemap generation.
//!
//! Emits `sitemap.xml` listing every indexable page, newest first. Above
//! the per-file URL cap the sitemap is partitioned into `sitemap-N.xml`
//! parts tied together by `sitemap_index.xml`, and `sitemap.xml` itself
//! becomes a one-entry index pointing at it, so the advertised URL stays
//! valid either way. Optionally maintains the `Sitemap:` directive in
//! `robots.txt`.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01T00:00:00Z</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    crawl::crawl,
    log,
    site::base_url_or_default,
    url::ExclusionPolicy,
    utils::{git::GitHistory, html::escape_xml},
};
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::{fs, path::Path};

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemaps
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const SITEMAP_FILE: &str = "sitemap.xml";
const INDEX_FILE: &str = "sitemap_index.xml";
const ROBOTS_FILE: &str = "robots.txt";

// ============================================================================
// Public API
// ============================================================================

/// Run the sitemap pass over the whole tree.
pub fn run(config: &'static SiteConfig) -> Result<()> {
    let root = config.get_root();
    let base_url = base_url_or_default(config);
    let policy = ExclusionPolicy::from_config(config);
    let history = GitHistory::discover(root);
    let documents = crawl(root, &base_url, &policy, &history)?;

    let mut entries: Vec<UrlEntry> = documents
        .iter()
        .filter_map(|doc| {
            doc.url.clone().map(|loc| UrlEntry {
                loc,
                lastmod: w3c(doc.lastmod),
            })
        })
        .collect();

    // Newest first; loc breaks timestamp ties so output is stable
    entries.sort_by(|a, b| b.lastmod.cmp(&a.lastmod).then_with(|| a.loc.cmp(&b.loc)));

    let total = entries.len();
    let cap = config.sitemap.max_urls;

    if total <= cap {
        write_single(root, &entries)?;
    } else {
        write_partitioned(root, &base_url, &entries, cap)?;
    }

    if config.sitemap.robots {
        ensure_robots(root, &base_url)?;
    }

    log!("sitemap"; "done. urls: {total}, cap: {cap}");
    Ok(())
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification timestamp, W3C datetime in UTC
    lastmod: String,
}

/// Everything fits in one file. Any index left over from a previous
/// partitioned run is now stale and gets removed.
fn write_single(root: &Path, entries: &[UrlEntry]) -> Result<()> {
    write_xml(&root.join(SITEMAP_FILE), &render_urlset(entries))?;

    let index_path = root.join(INDEX_FILE);
    if index_path.exists() {
        fs::remove_file(&index_path)
            .with_context(|| format!("Failed to remove stale {}", index_path.display()))?;
        log!("sitemap"; "removed stale {INDEX_FILE}");
    }

    Ok(())
}

/// Over the cap: emit numbered parts, the index tying them together,
/// and sitemap.xml as a one-entry index pointing at the real one.
fn write_partitioned(root: &Path, base_url: &str, entries: &[UrlEntry], cap: usize) -> Result<()> {
    let now = w3c(Utc::now());
    let base = base_url.trim_end_matches('/');

    let mut part_locs = Vec::new();
    for (n, chunk) in entries.chunks(cap).enumerate() {
        let name = format!("sitemap-{}.xml", n + 1);
        write_xml(&root.join(&name), &render_urlset(chunk))?;
        part_locs.push(UrlEntry {
            loc: format!("{base}/{name}"),
            lastmod: now.clone(),
        });
        log!("sitemap"; "{name}: {} urls", chunk.len());
    }

    write_xml(&root.join(INDEX_FILE), &render_index(&part_locs))?;

    let pointer = [UrlEntry {
        loc: format!("{base}/{INDEX_FILE}"),
        lastmod: now,
    }];
    write_xml(&root.join(SITEMAP_FILE), &render_index(&pointer))?;

    Ok(())
}

/// Render a `<urlset>` document.
fn render_urlset(entries: &[UrlEntry]) -> String {
    render(entries, "urlset", "url")
}

/// Render a `<sitemapindex>` document.
fn render_index(entries: &[UrlEntry]) -> String {
    render(entries, "sitemapindex", "sitemap")
}

fn render(entries: &[UrlEntry], container: &str, item: &str) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<{container} xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for entry in entries {
        xml.push_str(&format!("  <{item}>\n"));
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod));
        xml.push_str(&format!("  </{item}>\n"));
    }

    xml.push_str(&format!("</{container}>\n"));
    xml
}

fn write_xml(path: &Path, xml: &str) -> Result<()> {
    fs::write(path, xml).with_context(|| format!("Failed to write {}", path.display()))?;
    log!("sitemap"; "{}", path.file_name().unwrap_or_default().to_string_lossy());
    Ok(())
}

/// W3C datetime in UTC, second precision.
fn w3c(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Keep exactly one `Sitemap:` directive in robots.txt, pointing at the
/// advertised sitemap URL. Other lines are preserved.
fn ensure_robots(root: &Path, base_url: &str) -> Result<()> {
    let path = root.join(ROBOTS_FILE);
    let directive = format!("Sitemap: {}/{SITEMAP_FILE}", base_url.trim_end_matches('/'));

    let existing = if path.exists() {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        // Fresh file gets a permissive default policy
        "User-agent: *\nAllow: /\n".to_string()
    };

    let mut lines: Vec<&str> = existing
        .lines()
        .filter(|line| !line.trim_start().to_ascii_lowercase().starts_with("sitemap:"))
        .collect();
    lines.push(&directive);

    let updated = format!("{}\n", lines.join("\n"));
    if updated != existing {
        fs::write(&path, &updated)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log!("sitemap"; "{ROBOTS_FILE}: {directive}");
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
