use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    /// The path carries no locale prefix while the policy requires one for
    /// every locale, default included. The host decides the response (404).
    #[error("No route for '{0}': a locale prefix is required")]
    RouteNotFound(String),

    #[error("Malformed path '{0}': must start with '/' and contain no '.' or '..' segments")]
    MalformedPath(String),

    #[error("Unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("Cannot build alternate URL: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, RouteError>;
