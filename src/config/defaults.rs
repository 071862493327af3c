//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn repository() -> Option<String> {
        None
    }

    pub fn language() -> String {
        "en".into()
    }
}

// ============================================================================
// [scan] Section Defaults
// ============================================================================

pub mod scan {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    /// Directories that never contain indexable pages: version control,
    /// CI metadata, build tooling and static asset trees.
    pub fn exclude_dirs() -> Vec<String> {
        [
            ".git",
            ".github",
            "tools",
            "assets",
            "images",
            "img",
            "fonts",
            "css",
            "js",
            "vendor",
            "node_modules",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

// ============================================================================
// [sitemap] Section Defaults
// ============================================================================

pub mod sitemap {
    /// Maximum URLs per sitemap file. The protocol allows 50 000; staying
    /// slightly below keeps the files comfortably within the limit.
    pub fn max_urls() -> usize {
        49_000
    }
}

// ============================================================================
// [rss] Section Defaults
// ============================================================================

pub mod rss {
    use std::path::PathBuf;

    pub fn path() -> PathBuf {
        "rss.xml".into()
    }

    /// 0 = no limit
    pub fn max_items() -> usize {
        0
    }
}

// ============================================================================
// [tracking] Section Defaults
// ============================================================================

pub mod tracking {
    pub fn id() -> Option<String> {
        None
    }
}
