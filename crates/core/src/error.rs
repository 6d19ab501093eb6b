use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// site.toml is not valid TOML or does not match the expected shape.
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// site.toml parsed, but its values break a routing or site invariant.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
