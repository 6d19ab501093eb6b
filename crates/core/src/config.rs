use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: String,
    i18n: RawI18n,
    #[serde(default, rename = "integration")]
    integrations: Vec<Integration>,
    #[serde(default)]
    content: Option<RawContent>,
}

#[derive(Debug, Deserialize)]
struct RawI18n {
    default_locale: String,
    locales: Vec<String>,
    #[serde(default)]
    routing: RoutingPolicy,
}

#[derive(Debug, Deserialize)]
struct RawContent {
    dir: Option<String>,       // Convert to PathBuf
    route_base: Option<String>,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Loading site configuration");
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let site = parse_site_url(&raw.site)?;
    let locales = LocaleSet::new(raw.i18n.locales, &raw.i18n.default_locale)?;

    let content = match raw.content {
        Some(c) => {
            let dir = match c.dir {
                Some(dir) => validate_path(&dir, "content.dir")?,
                None => PathBuf::from(DEFAULT_CONTENT_DIR),
            };
            let route_base = c
                .route_base
                .unwrap_or_else(|| DEFAULT_ROUTE_BASE.to_string());
            if !route_base.starts_with('/') {
                return Err(Error::InvalidConfiguration(format!(
                    "content.route_base must start with '/': '{}'",
                    route_base
                )));
            }
            ContentConfig { dir, route_base }
        }
        None => ContentConfig::default(),
    };

    for integration in &raw.integrations {
        if integration.name.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "Integration entries need a non-empty name".to_string(),
            ));
        }
    }

    tracing::debug!(
        site = %site,
        default_locale = %locales.default_locale(),
        locales = locales.len(),
        prefix_default_locale = raw.i18n.routing.prefix_default_locale,
        integrations = raw.integrations.len(),
        "Site configuration validated"
    );

    Ok(SiteConfig {
        site,
        i18n: I18nConfig {
            locales,
            routing: raw.i18n.routing,
        },
        integrations: raw.integrations,
        content,
    })
}

/// The base URL must be absolute http(s) with a host, since alternates and
/// sitemap entries are joined onto it.
fn parse_site_url(s: &str) -> Result<Url> {
    let url = Url::parse(s)
        .map_err(|e| Error::InvalidConfiguration(format!("Invalid site URL '{}': {}", s, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::InvalidConfiguration(format!(
            "Site URL must be an absolute http(s) URL: '{}'",
            s
        )));
    }

    Ok(url)
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references (`..`) so the
/// content directory always stays inside the site directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    if path_str.trim().is_empty() {
        return Err(Error::InvalidConfiguration(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::InvalidConfiguration(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path
        .components()
        .any(|c| c == std::path::Component::ParentDir)
    {
        return Err(Error::InvalidConfiguration(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUDOFIX: &str = r##"
site = "https://sudofix.dev"

[i18n]
default_locale = "en"
locales = ["en", "pt", "es"]

[i18n.routing]
prefix_default_locale = false

[[integration]]
name = "sitemap"

[[integration]]
name = "tailwindcss"
kind = "vite-plugin"
"##;

    #[test]
    fn test_parse_full_config() {
        let config = parse_site_toml_str(SUDOFIX).unwrap();
        assert_eq!(config.site.as_str(), "https://sudofix.dev/");
        assert_eq!(config.i18n.locales.default_locale().as_str(), "en");
        assert_eq!(config.i18n.locales.len(), 3);
        assert!(!config.i18n.routing.prefix_default_locale);
        assert_eq!(config.integrations.len(), 2);
        assert_eq!(config.integrations[1].kind.as_deref(), Some("vite-plugin"));
        assert_eq!(config.content.dir, PathBuf::from("src/content/blog"));
        assert_eq!(config.content.route_base, "/blog");
    }

    #[test]
    fn test_routing_defaults_to_unprefixed() {
        let toml = r##"
site = "https://example.com"

[i18n]
default_locale = "en"
locales = ["en"]
"##;
        let config = parse_site_toml_str(toml).unwrap();
        assert!(!config.i18n.routing.prefix_default_locale);
        assert!(config.integrations.is_empty());
    }

    #[test]
    fn test_rejects_default_outside_locales() {
        let toml = r##"
site = "https://example.com"

[i18n]
default_locale = "fr"
locales = ["en", "pt"]
"##;
        let result = parse_site_toml_str(toml);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_duplicate_locales() {
        let toml = r##"
site = "https://example.com"

[i18n]
default_locale = "en"
locales = ["en", "pt", "pt"]
"##;
        let result = parse_site_toml_str(toml);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_rejects_relative_site_url() {
        let toml = r##"
site = "sudofix.dev"

[i18n]
default_locale = "en"
locales = ["en"]
"##;
        assert!(matches!(
            parse_site_toml_str(toml),
            Err(Error::InvalidConfiguration(_))
        ));

        let toml = r##"
site = "ftp://sudofix.dev"

[i18n]
default_locale = "en"
locales = ["en"]
"##;
        let err = parse_site_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn test_missing_i18n_is_parse_error() {
        let toml = r##"site = "https://example.com""##;
        assert!(matches!(
            parse_site_toml_str(toml),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_content_section() {
        let toml = r##"
site = "https://example.com"

[i18n]
default_locale = "en"
locales = ["en", "de"]

[content]
dir = "docs"
route_base = "/docs"
"##;
        let config = parse_site_toml_str(toml).unwrap();
        assert_eq!(config.content.dir, PathBuf::from("docs"));
        assert_eq!(config.content.route_base, "/docs");
    }

    #[test]
    fn test_content_rejects_bad_route_base() {
        let toml = r##"
site = "https://example.com"

[i18n]
default_locale = "en"
locales = ["en"]

[content]
route_base = "blog"
"##;
        let err = parse_site_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("route_base"));
    }

    #[test]
    fn test_validate_path_rejects_traversal() {
        let result = validate_path("../outside", "content.dir");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Parent directory references")
        );

        let result = validate_path("/etc", "content.dir");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("content.dir"));

        assert!(validate_path("   ", "content.dir").is_err());
        assert!(validate_path("src/content/blog", "content.dir").is_ok());
    }

    #[test]
    fn test_parse_site_toml_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, SUDOFIX).unwrap();

        let config = parse_site_toml(&path).unwrap();
        assert_eq!(config.i18n.locales.len(), 3);

        let missing = parse_site_toml(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
