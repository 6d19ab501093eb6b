use anyhow::Result;
use locale_kit_router::{LocaleRouter, ResolvedRoute, RouteError};
use std::path::PathBuf;

use super::{load_site, to_json};

/// Resolve `url_path` against the site's locale configuration.
///
/// A path with no locale prefix under a strict prefix policy is reported as
/// not found and makes the command fail, like a host would answer 404.
pub fn run(path: PathBuf, url_path: &str, json: bool) -> Result<()> {
    let config = load_site(&path)?;
    let router = LocaleRouter::from_config(&config.i18n);

    let route = resolve_route(&router, url_path)?;
    println!("{}", render(&route, json)?);

    Ok(())
}

fn resolve_route(router: &LocaleRouter, url_path: &str) -> Result<ResolvedRoute> {
    match router.resolve(url_path) {
        Ok(route) => Ok(route),
        Err(e @ RouteError::RouteNotFound(_)) => {
            anyhow::bail!(
                "{}\nDefault-locale pages need the /{} prefix under this configuration",
                e,
                router.locales().default_locale()
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn render(route: &ResolvedRoute, json: bool) -> Result<String> {
    if json {
        return to_json(route);
    }
    Ok(format!(
        "locale:    {}\nremainder: {}",
        route.locale, route.remainder
    ))
}
