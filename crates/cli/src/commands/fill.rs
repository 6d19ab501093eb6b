use anyhow::{Context, Result};
use std::path::PathBuf;

use super::{load_site, load_tree};

/// Copy default-locale entries into every locale that lacks them, so each
/// localized route resolves to a page until a real translation lands.
pub fn run(path: PathBuf, dry_run: bool) -> Result<()> {
    let config = load_site(&path)?;
    let tree = load_tree(&path, &config)?;

    let coverage = tree.coverage();
    if coverage.is_complete() {
        println!("✓ Nothing to fill: every entry is translated");
        return Ok(());
    }

    if dry_run {
        println!("Would copy {} file(s):", coverage.missing.len());
        for gap in &coverage.missing {
            println!(
                "   {} → {}/{}",
                gap.source.display(),
                gap.locale,
                gap.slug
            );
        }
        return Ok(());
    }

    println!("📝 Filling missing translations with {} content...", coverage.default_locale);
    let written = tree.fill_missing().context("Failed to fill missing translations")?;
    for file in &written {
        println!("   ✓ {}", file.display());
    }
    println!("\n✅ Wrote {} file(s)", written.len());

    Ok(())
}
