use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Complete site configuration
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Absolute base URL of the deployed site
    pub site: Url,
    pub i18n: I18nConfig,
    pub integrations: Vec<Integration>,
    pub content: ContentConfig,
}

/// Internationalization settings
#[derive(Debug, Clone)]
pub struct I18nConfig {
    pub locales: LocaleSet,
    pub routing: RoutingPolicy,
}

/// A locale identifier such as `en` or `pt-BR`.
///
/// Matching is exact and case-sensitive. Identifiers are restricted to ASCII
/// letters, digits, `-` and `_` so that a locale always fits in one path
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidConfiguration(
                "Locale identifiers must not be empty".to_string(),
            ));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::InvalidConfiguration(format!(
                "Invalid locale identifier '{}': use ASCII letters, digits, '-' or '_'",
                id
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free set of locales with one designated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    locales: Vec<Locale>,
    default: usize,
}

impl LocaleSet {
    /// Build a locale set, rejecting duplicates, malformed identifiers and a
    /// default that is not one of `locales`.
    pub fn new<I, S>(locales: I, default_locale: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let locales = locales
            .into_iter()
            .map(Locale::new)
            .collect::<Result<Vec<_>>>()?;

        if locales.is_empty() {
            return Err(Error::InvalidConfiguration(
                "At least one locale must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for locale in &locales {
            if !seen.insert(locale.as_str()) {
                return Err(Error::InvalidConfiguration(format!(
                    "Duplicate locale '{}' in locales",
                    locale
                )));
            }
        }

        let default = locales
            .iter()
            .position(|l| l.as_str() == default_locale)
            .ok_or_else(|| {
                Error::InvalidConfiguration(format!(
                    "Default locale '{}' is not one of the configured locales [{}]",
                    default_locale,
                    locales
                        .iter()
                        .map(Locale::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        Ok(Self { locales, default })
    }

    pub fn default_locale(&self) -> &Locale {
        &self.locales[self.default]
    }

    pub fn is_default(&self, locale: &Locale) -> bool {
        locale == self.default_locale()
    }

    /// Look up a configured locale by identifier
    pub fn get(&self, id: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.as_str() == id)
    }

    /// Locales in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    /// Every locale except the default, in configuration order
    pub fn non_default(&self) -> impl Iterator<Item = &Locale> {
        self.locales
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.default)
            .map(|(_, l)| l)
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

/// Whether the default locale's routes carry a locale prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RoutingPolicy {
    #[serde(default)]
    pub prefix_default_locale: bool,
}

/// A build plugin declared in site.toml. Opaque to routing; recorded so the
/// host build can be checked and listed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Integration {
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
}

/// Localized content collection layout
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Collection root, relative to the site directory. Each locale gets a
    /// subdirectory named after its identifier.
    pub dir: PathBuf,
    /// URL path under which collection entries are served, e.g. `/blog`
    pub route_base: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            route_base: DEFAULT_ROUTE_BASE.to_string(),
        }
    }
}

impl ContentConfig {
    /// URL path of one entry, e.g. `/blog/fix-keyerror`
    pub fn entry_path(&self, slug: &str) -> String {
        format!("{}/{}", self.route_base.trim_end_matches('/'), slug)
    }
}

pub const DEFAULT_CONTENT_DIR: &str = "src/content/blog";
pub const DEFAULT_ROUTE_BASE: &str = "/blog";
