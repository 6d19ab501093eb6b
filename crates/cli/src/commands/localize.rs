use anyhow::Result;
use locale_kit_core::SiteConfig;
use locale_kit_router::LocaleRouter;
use std::path::PathBuf;

use super::{load_site, to_json};

/// Print the localized form of `url_path`.
///
/// With a locale, prints that one path. Without one, prints every locale's
/// path next to its absolute URL.
pub fn run(path: PathBuf, url_path: &str, locale: Option<&str>, json: bool) -> Result<()> {
    let config = load_site(&path)?;
    let router = LocaleRouter::from_config(&config.i18n);

    println!("{}", render(&config, &router, url_path, locale, json)?);

    Ok(())
}

fn render(
    config: &SiteConfig,
    router: &LocaleRouter,
    url_path: &str,
    locale: Option<&str>,
    json: bool,
) -> Result<String> {
    if let Some(locale) = locale {
        let localized = router.localize(url_path, locale)?;
        if json {
            return to_json(&serde_json::json!({ "locale": locale, "path": localized }));
        }
        return Ok(localized);
    }

    let alternates = router.alternates(url_path, &config.site)?;
    if json {
        return to_json(&alternates);
    }

    Ok(alternates
        .iter()
        .map(|a| format!("{:<8} {}", a.locale.as_str(), a.href))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use locale_kit_core::parse_site_toml_str;

    fn setup() -> (SiteConfig, LocaleRouter) {
        let config = parse_site_toml_str(
            "site = \"https://sudofix.dev\"\n[i18n]\ndefault_locale = \"en\"\nlocales = [\"en\", \"pt\", \"es\"]\n",
        )
        .unwrap();
        let router = LocaleRouter::from_config(&config.i18n);
        (config, router)
    }

    #[test]
    fn test_localize_single_locale() {
        let (config, router) = setup();
        assert_eq!(
            render(&config, &router, "/about", Some("es"), false).unwrap(),
            "/es/about"
        );
        assert_eq!(
            render(&config, &router, "/pt/about", Some("en"), false).unwrap(),
            "/about"
        );

        let value: serde_json::Value =
            serde_json::from_str(&render(&config, &router, "/about", Some("pt"), true).unwrap())
                .unwrap();
        assert_eq!(value["locale"], "pt");
        assert_eq!(value["path"], "/pt/about");
    }

    #[test]
    fn test_localize_all_locales() {
        let (config, router) = setup();
        let text = render(&config, &router, "/about", None, false).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "en       https://sudofix.dev/about",
                "pt       https://sudofix.dev/pt/about",
                "es       https://sudofix.dev/es/about",
            ]
        );

        let value: serde_json::Value =
            serde_json::from_str(&render(&config, &router, "/about", None, true).unwrap()).unwrap();
        assert_eq!(value[2]["locale"], "es");
        assert_eq!(value[2]["href"], "https://sudofix.dev/es/about");
    }

    #[test]
    fn test_localize_unknown_locale() {
        let (config, router) = setup();
        let err = render(&config, &router, "/about", Some("fr"), false).unwrap_err();
        assert!(err.to_string().contains("Unknown locale 'fr'"));
    }
}
