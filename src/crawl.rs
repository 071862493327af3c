//! Site tree crawler.
//!
//! Walks a rendered HTML tree once and hands every pass the same view of
//! it: path, root-relative path, derived canonical URL, and a last
//! modification timestamp. Directory exclusions prune whole subtrees;
//! pages with no canonical URL (error pages, verification stubs) are
//! still visited so mutation passes can see them, they just carry
//! `url: None`.

use crate::{
    log,
    url::{ExclusionPolicy, canonicalize},
    utils::git::History,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// One HTML page found under the site root.
#[derive(Debug, Clone)]
pub struct Document {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the site root
    pub rel: PathBuf,
    /// Canonical URL, `None` for pages excluded from sitemaps and feeds
    pub url: Option<String>,
    /// Last modification time: git history, else file mtime, else epoch
    pub lastmod: DateTime<Utc>,
}

/// Collect every HTML page under `root` in stable lexicographic order.
///
/// Mutation passes that do not care about timestamps pass
/// [`NoHistory`](crate::utils::git::NoHistory) to skip the history walk.
pub fn crawl(
    root: &Path,
    base_url: &str,
    policy: &ExclusionPolicy,
    history: &dyn History,
) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| policy.skips_dir(name))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                // An unreadable entry costs us that entry, not the run
                log!("error"; "crawl: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_html(entry.path()) {
            continue;
        }

        let path = entry.path().to_path_buf();
        let rel = path.strip_prefix(root)?.to_path_buf();
        let url = canonicalize(&rel, base_url, policy);
        let lastmod = lastmod(&path, history);

        documents.push(Document {
            path,
            rel,
            url,
            lastmod,
        });
    }

    Ok(documents)
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// History first, filesystem mtime second, epoch as the last resort.
fn lastmod(path: &Path, history: &dyn History) -> DateTime<Utc> {
    history
        .last_commit_time(path)
        .or_else(|| {
            fs::metadata(path)
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from)
        })
        .unwrap_or(DateTime::UNIX_EPOCH)
}
