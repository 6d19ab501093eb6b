use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use locale_kit_content::{DEFAULT_MAX_SLUG_LEN, slugify};
use std::fs;
use std::path::PathBuf;

use super::{content_dir, load_site};

/// Create `<content>/<default locale>/<slug>.md` with a frontmatter block.
///
/// The slug comes from the title. An existing entry is never replaced.
pub fn run(path: PathBuf, title: &str, description: Option<&str>, tags: &[String]) -> Result<()> {
    let config = load_site(&path)?;

    let slug = slugify(title, DEFAULT_MAX_SLUG_LEN);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title '{}'", title);
    }

    let locale = config.i18n.locales.default_locale();
    let dir = content_dir(&path, &config).join(locale.as_str());
    let file = dir.join(format!("{}.md", slug));

    if file.exists() {
        anyhow::bail!(
            "Entry already exists: {}\nHint: pick a different title or edit the existing file",
            file.display()
        );
    }

    let body = render_entry(title, description, tags, Local::now().date_naive());

    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&file, body).with_context(|| format!("Failed to write {}", file.display()))?;

    println!("✓ Created {}", file.display());
    println!("  Route: {}", config.content.entry_path(&slug));
    println!(
        "\nRun 'locale-kit fill {}' to seed the other locales",
        path.display()
    );

    Ok(())
}

pub(super) fn render_entry(
    title: &str,
    description: Option<&str>,
    tags: &[String],
    pub_date: NaiveDate,
) -> String {
    let tags = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"", yaml_escape(t)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "---\n\
title: \"{}\"\n\
description: \"{}\"\n\
pubDate: \"{}\"\n\
tags: [{}]\n\
---\n\
\n",
        yaml_escape(title),
        yaml_escape(description.unwrap_or_default()),
        pub_date.format("%Y-%m-%d"),
        tags
    )
}

/// Escape for a YAML double-quoted scalar
fn yaml_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
