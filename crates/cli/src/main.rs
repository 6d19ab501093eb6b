mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "locale-kit")]
#[command(version, about = "Locale routing and content tooling for multilingual static sites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a site directory with site.toml and locale folders
    Init {
        /// Path to site directory
        path: PathBuf,

        /// Absolute base URL of the site
        #[arg(long, default_value = "https://example.com")]
        site: String,

        /// Comma-separated locale identifiers
        #[arg(long, value_delimiter = ',', default_value = "en")]
        locales: Vec<String>,

        /// Default locale (defaults to the first of --locales)
        #[arg(long)]
        default_locale: Option<String>,

        /// Require a prefix on default-locale routes too
        #[arg(long)]
        prefix_default_locale: bool,
    },

    /// Validate site configuration
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Resolve a request path to its locale and locale-free remainder
    Resolve {
        /// Path to site directory
        path: PathBuf,

        /// Request path, e.g. /pt/about
        url_path: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the path under which a page is served in a locale
    Localize {
        /// Path to site directory
        path: PathBuf,

        /// Locale-agnostic path, e.g. /about
        url_path: String,

        /// Target locale (omit to list every locale with absolute URLs)
        locale: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List localized routes of every content entry
    Routes {
        /// Path to site directory
        path: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Report missing and orphaned translations
    Audit {
        /// Path to site directory
        path: PathBuf,

        /// Fail when any translation is missing
        #[arg(long)]
        strict: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Copy default-locale entries into locales that lack them
    Fill {
        /// Path to site directory
        path: PathBuf,

        /// Only list what would be copied
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a new default-locale entry with frontmatter
    New {
        /// Path to site directory
        path: PathBuf,

        /// Entry title (also the source of its slug)
        title: String,

        /// Short description for the frontmatter
        #[arg(short, long)]
        description: Option<String>,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// Create default-locale entries from an error catalogue CSV
    Import {
        /// Path to site directory
        path: PathBuf,

        /// CSV with error_code, context and solution_hint columns
        csv: PathBuf,
    },

    /// Quote unquoted pubDate values in content frontmatter
    Frontmatter {
        /// Path to site directory
        path: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Used when `RUST_LOG` is unset. Targets match by prefix, so this covers
/// every `locale_kit*` crate.
const DEFAULT_LOG_FILTER: &str = "locale_kit=info";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "locale-kit starting");

    match cli.command {
        Command::Init {
            path,
            site,
            locales,
            default_locale,
            prefix_default_locale,
        } => commands::init::run(
            path,
            &site,
            &locales,
            default_locale.as_deref(),
            prefix_default_locale,
        ),
        Command::Validate { path } => commands::validate::run(path),
        Command::Resolve {
            path,
            url_path,
            json,
        } => commands::resolve::run(path, &url_path, json),
        Command::Localize {
            path,
            url_path,
            locale,
            json,
        } => commands::localize::run(path, &url_path, locale.as_deref(), json),
        Command::Routes { path, json } => commands::routes::run(path, json),
        Command::Audit { path, strict, json } => commands::audit::run(path, strict, json),
        Command::Fill { path, dry_run } => commands::fill::run(path, dry_run),
        Command::New {
            path,
            title,
            description,
            tags,
        } => commands::new::run(path, &title, description.as_deref(), &tags),
        Command::Import { path, csv } => commands::import::run(path, csv),
        Command::Frontmatter { path } => commands::frontmatter::run(path),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "locale-kit", &mut io::stdout());
            Ok(())
        }
    }
}
