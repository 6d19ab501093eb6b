pub mod audit;
pub mod fill;
pub mod frontmatter;
pub mod import;
pub mod init;
pub mod localize;
pub mod new;
pub mod resolve;
pub mod routes;
pub mod validate;

use anyhow::{Context, Result};
use locale_kit_content::ContentTree;
use locale_kit_core::{SiteConfig, parse_site_toml};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "site.toml";

/// Load and validate `<path>/site.toml`
pub fn load_site(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'locale-kit init {}' first",
            CONFIG_FILE,
            path.display(),
            path.display()
        );
    }

    parse_site_toml(&config_path).with_context(|| format!("Failed to load {}", config_path.display()))
}

/// Absolute location of the content collection
pub fn content_dir(path: &Path, config: &SiteConfig) -> PathBuf {
    path.join(&config.content.dir)
}

/// Scan the site's content collection
pub fn load_tree(path: &Path, config: &SiteConfig) -> Result<ContentTree> {
    let dir = content_dir(path, config);
    ContentTree::scan(&dir, &config.i18n.locales)
        .with_context(|| format!("Failed to scan content in {}", dir.display()))
}

pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}
