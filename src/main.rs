//! Atelier - a component-based static page builder.

mod build;
mod cli;
mod compiler;
mod config;
mod logger;
mod manifest;
mod utils;
mod watch;

use anyhow::Result;
use build::build_site;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use std::path::Path;
use watch::watch_for_changes_blocking;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    if cli.is_watch() {
        // The initial build may fail (e.g. manifest mid-edit); the watcher
        // keeps running so the next change can fix it.
        if let Err(err) = build_site(config) {
            log!("error"; "{err:#}");
        }
        watch_for_changes_blocking(config)
    } else {
        build_site(config)
    }
}

/// Load and validate configuration from CLI arguments.
///
/// The config file is optional: when absent, the defaults describe the
/// standard project layout.
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
