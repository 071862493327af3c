//! `[scan]` section configuration.
//!
//! Controls where the tree crawl starts and which directories it never
//! descends into.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[scan]` section in sitefix.toml - crawl scope.
///
/// # Example
/// ```toml
/// [scan]
/// root = "docs"
/// exclude_dirs = [".git", "assets", "drafts"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Site tree root. Defaults to the current directory when neither the
    /// config file nor the CLI provides one.
    #[serde(default = "defaults::scan::root")]
    #[educe(Default = defaults::scan::root())]
    pub root: Option<PathBuf>,

    /// Directory names the crawler never descends into.
    #[serde(default = "defaults::scan::exclude_dirs")]
    #[educe(Default = defaults::scan::exclude_dirs())]
    pub exclude_dirs: Vec<String>,
}
