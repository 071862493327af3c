//! Tracking counter pass.
//!
//! Ensures every page carries the site's Yandex Metrika counter under
//! the configured identifier. A page already carrying the target id is
//! left untouched. A page carrying the counter under a different id has
//! every occurrence of the id rewritten in place, preserving whatever
//! snippet markup the page author used. Pages with no counter at all
//! get the standard snippet inserted before `</head>`, falling back to
//! `</body>`, falling back to plain append.

use super::{Fallback, RE_BODY_CLOSE, RE_HEAD_CLOSE, insert_before_last};
use crate::{
    config::{ConfigError, SiteConfig},
    crawl::crawl,
    log,
    site::base_url_or_default,
    url::ExclusionPolicy,
    utils::git::NoHistory,
};
use anyhow::{Result, bail};
use regex::Regex;
use std::{fs, sync::LazyLock};

/// The three places the counter id appears in the standard snippet.
static RE_TAG_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://mc\.yandex\.ru/metrika/tag\.js\?id=(\d+)").unwrap());

static RE_WATCH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://mc\.yandex\.ru/watch/(\d+)").unwrap());

static RE_YM_INIT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ym\(\s*(\d+)\s*,\s*['"]init['"]"#).unwrap());

/// Standard counter snippet; `__ID__` is replaced with the real id.
const SNIPPET: &str = r#"<!-- Yandex.Metrika counter -->
<script type="text/javascript">
    (function(m,e,t,r,i,k,a){m[i]=m[i]||function(){(m[i].a=m[i].a||[]).push(arguments)};
    m[i].l=1*new Date();
    for (var j = 0; j < document.scripts.length; j++) {if (document.scripts[j].src === r) { return; }}
    k=e.createElement(t),a=e.getElementsByTagName(t)[0],k.async=1,k.src=r,a.parentNode.insertBefore(k,a)})
    (window, document, "script", "https://mc.yandex.ru/metrika/tag.js?id=__ID__", "ym");

    ym(__ID__, 'init', {ssr:true, webvisor:true, clickmap:true, ecommerce:"dataLayer", accurateTrackBounce:true, trackLinks:true});
</script>
<noscript><div><img src="https://mc.yandex.ru/watch/__ID__" style="position:absolute; left:-9999px;" alt="" /></div></noscript>
<!-- /Yandex.Metrika counter -->"#;

/// What the pass did to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Added,
    Updated,
    Unchanged,
}

fn render_snippet(id: &str) -> String {
    SNIPPET.replace("__ID__", id)
}

/// True when any counter encoding already carries the target id.
fn has_id(html: &str, id: &str) -> bool {
    [&RE_TAG_ID, &RE_WATCH_ID, &RE_YM_INIT_ID]
        .iter()
        .any(|re| re.captures_iter(html).any(|caps| &caps[1] == id))
}

/// True when any counter encoding is present at all.
fn has_counter(html: &str) -> bool {
    RE_TAG_ID.is_match(html) || RE_WATCH_ID.is_match(html) || RE_YM_INIT_ID.is_match(html)
}

/// Rewrite every counter id occurrence to `id`.
fn rewrite_id(html: &str, id: &str) -> String {
    let html = RE_TAG_ID.replace_all(html, format!("https://mc.yandex.ru/metrika/tag.js?id={id}"));
    let html = RE_WATCH_ID.replace_all(&html, format!("https://mc.yandex.ru/watch/{id}"));
    RE_YM_INIT_ID
        .replace_all(&html, format!("ym({id}, 'init'"))
        .into_owned()
}

/// Rewrite `html` so it carries the counter under `id`.
pub fn ensure_tracking(html: &str, id: &str) -> (String, Action) {
    if has_id(html, id) {
        return (html.to_string(), Action::Unchanged);
    }
    if has_counter(html) {
        return (rewrite_id(html, id), Action::Updated);
    }

    let fragment = format!("{}\n", render_snippet(id));
    let out = insert_before_last(
        html,
        &fragment,
        &[&RE_HEAD_CLOSE, &RE_BODY_CLOSE],
        Fallback::Append,
    );
    (out, Action::Added)
}

/// Run the tracking pass over the whole tree.
pub fn run(config: &'static SiteConfig) -> Result<()> {
    let dry_run = config.get_cli().dry_run();

    let Some(id) = &config.tracking.id else {
        bail!(ConfigError::Validation(
            "tracking id required: pass --id, set TRACKING_ID, or set [tracking].id".into()
        ));
    };
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        bail!(ConfigError::Validation(format!(
            "tracking id must be numeric, got `{id}`"
        )));
    }

    let base_url = base_url_or_default(config);
    let policy = ExclusionPolicy::from_config(config);
    let documents = crawl(config.get_root(), &base_url, &policy, &NoHistory)?;

    let mut added = 0usize;
    let mut updated = 0usize;
    let mut unchanged = 0usize;
    let mut failed = 0usize;

    for doc in &documents {
        let html = match fs::read_to_string(&doc.path) {
            Ok(html) => html,
            Err(err) => {
                log!("error"; "{}: {err}", doc.rel.display());
                failed += 1;
                continue;
            }
        };

        let (rewritten, action) = ensure_tracking(&html, id);
        if action == Action::Unchanged {
            unchanged += 1;
            continue;
        }

        if !dry_run && let Err(err) = fs::write(&doc.path, &rewritten) {
            log!("error"; "{}: {err}", doc.rel.display());
            failed += 1;
            continue;
        }
        match action {
            Action::Added => added += 1,
            Action::Updated => updated += 1,
            Action::Unchanged => {}
        }
        log!("track"; "{} ({action:?})", doc.rel.display());
    }

    let mode = if dry_run { " (dry run)" } else { "" };
    log!(
        "track";
        "done{mode}. pages: {}, added: {added}, updated: {updated}, unchanged: {unchanged}, failed: {failed}",
        documents.len()
    );
    Ok(())
}
