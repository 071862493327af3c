//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap. Every operational
//! flag also binds an environment variable, so the tool can be driven
//! entirely from CI environment blocks without arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sitefix static HTML post-processor CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site tree root (directory holding the HTML files)
    #[arg(short, long, env = "SITE_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file name (default: sitefix.toml, resolved under the root)
    #[arg(short = 'C', long, default_value = "sitefix.toml")]
    pub config: PathBuf,

    /// Override the base URL for the site.
    ///
    /// Skips detection from CNAME / repository conventions entirely.
    /// A missing scheme is defaulted to https://.
    #[arg(long = "base-url", env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Repository identifier in `owner/name` form.
    ///
    /// Used for the GitHub Pages URL conventions when no explicit base URL
    /// and no CNAME file are present.
    #[arg(long = "repo", env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ensure every page carries exactly one correct canonical link
    Canonical {
        /// Report intended changes without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Inject or repair the tracking counter on every page
    Track {
        /// Tracking counter identifier
        #[arg(long, env = "TRACKING_ID")]
        id: Option<String>,

        /// Report intended changes without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate sitemap.xml (partitioned with an index when too large)
    Sitemap {
        /// Maximum URLs per sitemap file
        #[arg(long, env = "MAX_URLS")]
        max_urls: Option<usize>,

        /// Create or update robots.txt with a Sitemap directive
        #[arg(long, env = "MAKE_ROBOTS", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        robots: Option<bool>,
    },

    /// Generate rss.xml from the crawled pages
    Rss {
        /// Maximum number of feed items (0 = no limit)
        #[arg(long, env = "MAX_ITEMS")]
        max_items: Option<usize>,

        /// Feed title
        #[arg(long, env = "SITE_TITLE")]
        title: Option<String>,

        /// Feed description
        #[arg(long, env = "SITE_DESCRIPTION")]
        description: Option<String>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_canonical(&self) -> bool {
        matches!(self.command, Commands::Canonical { .. })
    }
    pub const fn is_track(&self) -> bool {
        matches!(self.command, Commands::Track { .. })
    }
    pub const fn is_sitemap(&self) -> bool {
        matches!(self.command, Commands::Sitemap { .. })
    }
    pub const fn is_rss(&self) -> bool {
        matches!(self.command, Commands::Rss { .. })
    }

    /// Whether the current subcommand runs in dry-run mode.
    ///
    /// Only the mutating passes carry the flag; emitters always write.
    pub const fn dry_run(&self) -> bool {
        match self.command {
            Commands::Canonical { dry_run } | Commands::Track { dry_run, .. } => dry_run,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_dry_run() {
        let cli = Cli::parse_from(["sitefix", "canonical", "--dry-run"]);
        assert!(cli.is_canonical());
        assert!(cli.dry_run());
    }

    #[test]
    fn test_parse_sitemap_defaults() {
        let cli = Cli::parse_from(["sitefix", "sitemap"]);
        assert!(cli.is_sitemap());
        assert!(!cli.dry_run());
        match cli.command {
            Commands::Sitemap { max_urls, robots } => {
                assert_eq!(max_urls, None);
                assert_eq!(robots, None);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_track_id() {
        let cli = Cli::parse_from(["sitefix", "track", "--id", "12345"]);
        match cli.command {
            Commands::Track { ref id, dry_run } => {
                assert_eq!(id.as_deref(), Some("12345"));
                assert!(!dry_run);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_base_url_and_repo() {
        let cli = Cli::parse_from([
            "sitefix",
            "--base-url",
            "https://example.com",
            "--repo",
            "acme/widgets",
            "rss",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("https://example.com"));
        assert_eq!(cli.repository.as_deref(), Some("acme/widgets"));
        assert!(cli.is_rss());
    }
}
