// Locale-aware route resolution for a multilingual static site

pub mod error;
pub mod router;

pub use error::{Result, RouteError};
pub use router::{Alternate, LocaleRouter, ResolvedRoute};
