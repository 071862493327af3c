//! RSS feed generation.
//!
//! Builds the feed from finished HTML pages: the item title comes from
//! the page's `<title>`, the summary from the description meta tag with
//! `<h1>` and first paragraph as fallbacks, and the publication date
//! from the page's last modification time. Pages without a title cannot
//! make a valid item and are skipped with a warning.

use crate::{
    config::SiteConfig,
    crawl::{Document, crawl},
    log,
    site::base_url_or_default,
    url::ExclusionPolicy,
    utils::{
        git::GitHistory,
        html::{collapse_whitespace, strip_tags, unescape},
    },
};
use anyhow::{Result, anyhow};
use chrono::Utc;
use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{fs, sync::LazyLock};

/// Feed item titles are capped at this many characters.
const MAX_TITLE_LEN: usize = 300;

/// Feed item descriptions are capped at this many characters.
const MAX_DESC_LEN: usize = 500;

static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

static RE_META_DESC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+name=['"]description['"][^>]+content=['"]([^'"]*)['"][^>]*>"#,
    )
    .unwrap()
});

static RE_META_DESC_REVERSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta[^>]+content=['"]([^'"]*)['"][^>]+name=['"]description['"][^>]*>"#,
    )
    .unwrap()
});

static RE_H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap());

static RE_P: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());

// ============================================================================
// Public API
// ============================================================================

/// Run the feed pass over the whole tree.
pub fn run(config: &'static SiteConfig) -> Result<()> {
    let root = config.get_root();
    let base_url = base_url_or_default(config);
    let policy = ExclusionPolicy::from_config(config);
    let history = GitHistory::discover(root);

    let mut documents = crawl(root, &base_url, &policy, &history)?;
    // Newest first; rel breaks timestamp ties so output is stable
    documents.sort_by(|a, b| b.lastmod.cmp(&a.lastmod).then_with(|| a.rel.cmp(&b.rel)));

    let max_items = config.rss.max_items;
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for doc in &documents {
        if doc.url.is_none() {
            continue;
        }
        if max_items > 0 && items.len() >= max_items {
            break;
        }

        let html = match fs::read_to_string(&doc.path) {
            Ok(html) => html,
            Err(err) => {
                log!("error"; "{}: {err}", doc.rel.display());
                continue;
            }
        };

        match document_to_item(doc, &html) {
            Some(item) => items.push(item),
            None => {
                log!("rss"; "{}: no title, skipped", doc.rel.display());
                skipped += 1;
            }
        }
    }

    let count = items.len();
    let channel = ChannelBuilder::default()
        .title(&config.base.title)
        .link(base_url)
        .description(&config.base.description)
        .language(config.base.language.clone())
        .generator(env!("CARGO_PKG_NAME").to_string())
        .last_build_date(Utc::now().to_rfc2822())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validation failed: {e}"))?;

    let path = root.join(&config.rss.path);
    fs::write(&path, channel.to_string())?;

    log!(
        "rss";
        "{}: {count} items, {skipped} skipped",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a crawled page to a feed item.
/// Returns None when the page has no usable title.
fn document_to_item(doc: &Document, html: &str) -> Option<rss::Item> {
    let link = doc.url.clone()?;
    let title = extract_title(html)?;
    // A page offering no summary at all still gets one: its own title
    let description = extract_description(html).unwrap_or_else(|| title.clone());
    let pub_date = doc.lastmod.to_rfc2822();

    Some(
        ItemBuilder::default()
            .title(title)
            .link(Some(link.clone()))
            .guid(GuidBuilder::default().permalink(true).value(link).build())
            .description(description)
            .pub_date(pub_date)
            .build(),
    )
}

/// Text of the leftmost `<title>` element, cleaned and capped.
fn extract_title(html: &str) -> Option<String> {
    let raw = RE_TITLE.captures(html)?.get(1)?.as_str();
    let title = clean_text(raw);
    (!title.is_empty()).then(|| truncate_chars(&title, MAX_TITLE_LEN))
}

/// Page summary: description meta tag, else first `<h1>`, else first
/// paragraph. `None` when the page offers nothing usable.
fn extract_description(html: &str) -> Option<String> {
    let raw = RE_META_DESC
        .captures(html)
        .or_else(|| RE_META_DESC_REVERSED.captures(html))
        .or_else(|| RE_H1.captures(html))
        .or_else(|| RE_P.captures(html))?
        .get(1)?
        .as_str();

    let description = clean_text(raw);
    (!description.is_empty()).then(|| truncate_chars(&description, MAX_DESC_LEN))
}

fn clean_text(raw: &str) -> String {
    collapse_whitespace(&unescape(&strip_tags(raw)))
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
