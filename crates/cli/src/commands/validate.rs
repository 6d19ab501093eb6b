use anyhow::Result;
use std::path::PathBuf;

use super::{CONFIG_FILE, content_dir, load_site};

pub fn run(path: PathBuf) -> Result<()> {
    println!("Validating site at: {}", path.display());

    let config = load_site(&path)?;
    let locales = &config.i18n.locales;

    println!("✓ {} valid", CONFIG_FILE);
    println!("  Site: {}", config.site);
    println!(
        "  Locales: {} (default: {})",
        locales
            .iter()
            .map(|l| l.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        locales.default_locale()
    );
    println!(
        "  Default locale prefix: {}",
        if config.i18n.routing.prefix_default_locale {
            "required"
        } else {
            "omitted"
        }
    );

    if config.integrations.is_empty() {
        println!("  Integrations: none");
    } else {
        println!("  Integrations:");
        for integration in &config.integrations {
            match &integration.kind {
                Some(kind) => println!("    - {} ({})", integration.name, kind),
                None => println!("    - {}", integration.name),
            }
        }
    }

    let content = content_dir(&path, &config);
    if !content.is_dir() {
        println!("\n⚠ Content directory not found: {}", content.display());
        return Ok(());
    }

    for locale in locales.iter() {
        if !content.join(locale.as_str()).is_dir() {
            println!("⚠ No content directory for locale '{}'", locale);
        }
    }

    Ok(())
}
