//! Sitefix - a batch post-processor for rendered HTML trees.

mod cli;
mod config;
mod crawl;
mod generator;
mod inject;
mod logger;
mod site;
mod url;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Canonical { .. } => inject::canonical::run(config),
        Commands::Track { .. } => inject::tracking::run(config),
        Commands::Sitemap { .. } => generator::sitemap::run(config),
        Commands::Rss { .. } => generator::rss::run(config),
    }
}

/// Load and validate configuration from CLI arguments.
///
/// The config file is optional: a missing sitefix.toml means defaults
/// plus whatever the CLI provides.
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
