use crate::error::{Result, RouteError};
use locale_kit_core::{I18nConfig, Locale, LocaleSet, RoutingPolicy};
use serde::Serialize;
use url::Url;

/// Result of resolving an incoming path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    pub locale: Locale,
    /// The path with any locale prefix removed. Always starts with `/`.
    pub remainder: String,
}

/// Absolute URL of one page in one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternate {
    pub locale: Locale,
    pub href: Url,
}

/// Maps request paths to `(locale, remainder)` and back.
///
/// Holds only immutable configuration, so one router can be shared across
/// any number of threads.
#[derive(Debug, Clone)]
pub struct LocaleRouter {
    locales: LocaleSet,
    policy: RoutingPolicy,
}

impl LocaleRouter {
    pub fn new(locales: LocaleSet, policy: RoutingPolicy) -> Self {
        Self { locales, policy }
    }

    pub fn from_config(i18n: &I18nConfig) -> Self {
        Self::new(i18n.locales.clone(), i18n.routing)
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    /// Determine which locale serves `path` and what is left once its prefix
    /// is stripped.
    ///
    /// ```text
    /// locales = [en, pt, es], default = en, prefix_default_locale = false
    ///   /about      → en, /about
    ///   /pt/about   → pt, /about
    ///   /xx/about   → en, /xx/about
    ///
    /// prefix_default_locale = true
    ///   /about      → RouteNotFound
    ///   /en/about   → en, /about
    /// ```
    pub fn resolve(&self, path: &str) -> Result<ResolvedRoute> {
        check_path(path)?;

        if let Some((locale, rest)) = self.split_prefix(path) {
            tracing::trace!(path, locale = %locale, "Resolved prefixed route");
            return Ok(ResolvedRoute {
                locale: locale.clone(),
                remainder: rest.to_string(),
            });
        }

        if self.policy.prefix_default_locale {
            tracing::debug!(path, "No locale prefix under strict prefix policy");
            return Err(RouteError::RouteNotFound(path.to_string()));
        }

        Ok(ResolvedRoute {
            locale: self.locales.default_locale().clone(),
            remainder: path.to_string(),
        })
    }

    /// Produce the path under which `path` is served in `locale`.
    ///
    /// A locale prefix already present on `path` is stripped first, so the
    /// output never carries two prefixes.
    pub fn localize(&self, path: &str, locale: &str) -> Result<String> {
        check_path(path)?;

        let target = self
            .locales
            .get(locale)
            .ok_or_else(|| RouteError::UnknownLocale(locale.to_string()))?;

        let bare = match self.split_prefix(path) {
            Some((_, rest)) => rest,
            None => path,
        };

        if self.is_unprefixed(target) {
            Ok(bare.to_string())
        } else {
            Ok(format!("/{}{}", target, bare))
        }
    }

    /// Absolute URL of `path` in every configured locale, in configuration
    /// order. This is what alternate-language links and sitemap entries need.
    pub fn alternates(&self, path: &str, site: &Url) -> Result<Vec<Alternate>> {
        let base = directory_url(site);

        self.locales
            .iter()
            .map(|locale| -> Result<Alternate> {
                let localized = self.localize(path, locale.as_str())?;
                let href = base.join(&format!("./{}", localized.trim_start_matches('/')))?;
                Ok(Alternate {
                    locale: locale.clone(),
                    href,
                })
            })
            .collect()
    }

    fn is_unprefixed(&self, locale: &Locale) -> bool {
        self.locales.is_default(locale) && !self.policy.prefix_default_locale
    }

    /// Split a recognized locale prefix off `path`.
    ///
    /// A first segment counts as a prefix only when it is a configured locale
    /// that the policy expects to see as a prefix. The returned rest is
    /// never empty: `/pt` yields `/`.
    fn split_prefix<'a>(&self, path: &'a str) -> Option<(&Locale, &'a str)> {
        let after_slash = &path[1..];
        let (segment, rest) = match after_slash.find('/') {
            Some(i) => (&after_slash[..i], &after_slash[i..]),
            None => (after_slash, "/"),
        };

        let locale = self.locales.get(segment)?;
        if self.is_unprefixed(locale) {
            return None;
        }

        Some((locale, rest))
    }
}

/// A path must start with `/` and carry no `.`/`..` segments (plain or
/// percent-encoded) and no backslashes, since URL joins would collapse them.
fn check_path(path: &str) -> Result<()> {
    let malformed = !path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(is_dot_segment);

    if malformed {
        Err(RouteError::MalformedPath(path.to_string()))
    } else {
        Ok(())
    }
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Make sure the site URL ends in `/` so relative joins keep its base path
fn directory_url(site: &Url) -> Url {
    let mut base = site.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
