use anyhow::Result;
use locale_kit_content::ContentTree;
use locale_kit_core::SiteConfig;
use locale_kit_router::{Alternate, LocaleRouter};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::{load_site, load_tree, to_json};

/// One collection entry and the locales it is published in
#[derive(Debug, Serialize)]
struct RouteListing {
    slug: String,
    /// Locale-agnostic path, e.g. `/blog/fix-keyerror`
    path: String,
    alternates: Vec<Alternate>,
}

pub fn run(path: PathBuf, json: bool) -> Result<()> {
    let config = load_site(&path)?;
    let tree = load_tree(&path, &config)?;
    let router = LocaleRouter::from_config(&config.i18n);

    let listings = collect_routes(&config, &tree, &router)?;
    println!("{}", render(&listings, &tree, json)?);

    Ok(())
}

fn render(listings: &[RouteListing], tree: &ContentTree, json: bool) -> Result<String> {
    if json {
        return to_json(&listings);
    }

    if listings.is_empty() {
        return Ok(format!(
            "No content entries found in {}",
            tree.root().display()
        ));
    }

    let mut out = String::new();
    for listing in listings {
        out.push_str(&listing.path);
        out.push('\n');
        for alternate in &listing.alternates {
            out.push_str(&format!(
                "  {:<8} {}\n",
                alternate.locale.as_str(),
                alternate.href
            ));
        }
    }
    out.push_str(&format!("\n{} entries", listings.len()));

    Ok(out)
}

/// Routes for every slug in any locale, limited to the locales that have it
fn collect_routes(
    config: &SiteConfig,
    tree: &ContentTree,
    router: &LocaleRouter,
) -> Result<Vec<RouteListing>> {
    let slugs: BTreeSet<&str> = config
        .i18n
        .locales
        .iter()
        .flat_map(|locale| tree.slugs(locale))
        .collect();

    slugs
        .into_iter()
        .map(|slug| -> Result<RouteListing> {
            let path = config.content.entry_path(slug);
            let alternates = router
                .alternates(&path, &config.site)?
                .into_iter()
                .filter(|a| tree.has(&a.locale, slug))
                .collect();
            Ok(RouteListing {
                slug: slug.to_string(),
                path,
                alternates,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use locale_kit_core::parse_site_toml_str;
    use std::fs;
    use tempfile::TempDir;

    const SITE: &str = r##"
site = "https://sudofix.dev"

[i18n]
default_locale = "en"
locales = ["en", "pt", "es"]
"##;

    #[test]
    fn test_collect_routes() {
        let dir = TempDir::new().unwrap();
        for rel in ["en/fix-keyerror.md", "pt/fix-keyerror.md", "pt/only-pt.md"] {
            let file = dir.path().join(rel);
            fs::create_dir_all(file.parent().unwrap()).unwrap();
            fs::write(file, "---\ntitle: x\n---\n").unwrap();
        }

        let config = parse_site_toml_str(SITE).unwrap();
        let tree = ContentTree::scan(dir.path(), &config.i18n.locales).unwrap();
        let router = LocaleRouter::from_config(&config.i18n);

        let listings = collect_routes(&config, &tree, &router).unwrap();
        assert_eq!(listings.len(), 2);

        assert_eq!(listings[0].path, "/blog/fix-keyerror");
        let hrefs: Vec<&str> = listings[0]
            .alternates
            .iter()
            .map(|a| a.href.as_str())
            .collect();
        assert_eq!(
            hrefs,
            vec![
                "https://sudofix.dev/blog/fix-keyerror",
                "https://sudofix.dev/pt/blog/fix-keyerror",
            ]
        );

        assert_eq!(listings[1].slug, "only-pt");
        assert_eq!(listings[1].alternates.len(), 1);
        assert_eq!(
            listings[1].alternates[0].href.as_str(),
            "https://sudofix.dev/pt/blog/only-pt"
        );
    }

    #[test]
    fn test_render_routes() {
        let dir = TempDir::new().unwrap();
        let en = dir.path().join("en");
        fs::create_dir_all(&en).unwrap();
        fs::write(en.join("hello.md"), "---\ntitle: hi\n---\n").unwrap();

        let config = parse_site_toml_str(SITE).unwrap();
        let tree = ContentTree::scan(dir.path(), &config.i18n.locales).unwrap();
        let router = LocaleRouter::from_config(&config.i18n);
        let listings = collect_routes(&config, &tree, &router).unwrap();

        assert_eq!(
            render(&listings, &tree, false).unwrap(),
            "/blog/hello\n  en       https://sudofix.dev/blog/hello\n\n1 entries"
        );

        let value: serde_json::Value =
            serde_json::from_str(&render(&listings, &tree, true).unwrap()).unwrap();
        assert_eq!(value[0]["slug"], "hello");
        assert_eq!(value[0]["alternates"][0]["href"], "https://sudofix.dev/blog/hello");

        let empty = render(&[], &tree, false).unwrap();
        assert!(empty.starts_with("No content entries found"));
    }
}
