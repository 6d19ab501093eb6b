use anyhow::{Context, Result};
use locale_kit_core::{DEFAULT_CONTENT_DIR, DEFAULT_ROUTE_BASE, parse_site_toml_str};
use std::fs;
use std::path::{Path, PathBuf};

use super::CONFIG_FILE;

/// Escape a string for safe inclusion in a TOML basic string
///
/// The template is written by hand rather than serialized so that its
/// comments survive. See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Initialize a site directory.
///
/// Writes a starter site.toml and creates one content directory per locale
/// (`src/content/blog/<locale>/`). The generated configuration is parsed
/// back before anything is written, so an invalid locale list or site URL
/// fails here rather than at the next build.
///
/// # Errors
///
/// Returns an error if site.toml already exists, the options do not form a
/// valid configuration, or file operations fail.
pub fn run(
    path: PathBuf,
    site: &str,
    locales: &[String],
    default_locale: Option<&str>,
    prefix_default_locale: bool,
) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            CONFIG_FILE,
            config_path.display()
        );
    }

    let default_locale = default_locale
        .or_else(|| locales.first().map(String::as_str))
        .context("At least one locale is required")?;

    let toml = generate_site_toml(site, locales, default_locale, prefix_default_locale);
    let config = parse_site_toml_str(&toml).context("Invalid init options")?;

    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    fs::write(&config_path, &toml).context("Failed to write site.toml")?;

    let content = path.join(&config.content.dir);
    for locale in config.i18n.locales.iter() {
        create_locale_dir(&content, locale.as_str())?;
    }

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── {}            ← Site URL, locales, routing", CONFIG_FILE);
    println!("  └── {}/", config.content.dir.display());
    for locale in config.i18n.locales.iter() {
        let marker = if config.i18n.locales.is_default(locale) {
            "  ← default"
        } else {
            ""
        };
        println!("      ├── {}/{}", locale, marker);
    }

    println!("\nNext steps:");
    println!("  1. Edit {} (set site URL, integrations)", CONFIG_FILE);
    println!(
        "  2. Add an entry: locale-kit new {} \"My first post\"",
        path.display()
    );
    println!("  3. Check coverage: locale-kit audit {}", path.display());

    Ok(())
}

fn create_locale_dir(content: &Path, locale: &str) -> Result<()> {
    let dir = content.join(locale);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(())
}

fn generate_site_toml(
    site: &str,
    locales: &[String],
    default_locale: &str,
    prefix_default_locale: bool,
) -> String {
    let locale_list = locales
        .iter()
        .map(|l| format!("\"{}\"", toml_escape_string(l.trim())))
        .collect::<Vec<_>>()
        .join(", ");
    let site = toml_escape_string(site);
    let default_locale = toml_escape_string(default_locale);

    format!(
        "# Generated by locale-kit init\n\
# Edit this file to customize your site\n\
\n\
site = \"{site}\"\n\
\n\
[i18n]\n\
default_locale = \"{default_locale}\"\n\
locales = [{locale_list}]\n\
\n\
[i18n.routing]\n\
# When false, default-locale pages live at /about instead of /{default_locale}/about\n\
prefix_default_locale = {prefix_default_locale}\n\
\n\
# Build plugins run by the host framework, listed in order\n\
[[integration]]\n\
name = \"sitemap\"\n\
\n\
[content]\n\
dir = \"{DEFAULT_CONTENT_DIR}\"\n\
route_base = \"{DEFAULT_ROUTE_BASE}\"\n"
    )
}
