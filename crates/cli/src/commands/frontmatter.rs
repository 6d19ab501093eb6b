use anyhow::{Context, Result};
use locale_kit_content::fix_frontmatter_tree;
use std::path::PathBuf;

use super::{content_dir, load_site};

pub fn run(path: PathBuf) -> Result<()> {
    let config = load_site(&path)?;
    let dir = content_dir(&path, &config);

    println!("Scanning {}...", dir.display());
    let summary = fix_frontmatter_tree(&dir).context("Failed to repair frontmatter")?;

    for file in &summary.fixed {
        println!("   ✓ Quoted pubDate in {}", file.display());
    }
    for file in &summary.without_frontmatter {
        println!("   ⚠ No frontmatter: {}", file.display());
    }
    println!(
        "\nScanned {} file(s), fixed {}",
        summary.scanned,
        summary.fixed.len()
    );

    Ok(())
}
