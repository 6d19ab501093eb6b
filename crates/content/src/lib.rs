// Localized Markdown collections: slugs, frontmatter repair, translation coverage

pub mod error;
pub mod frontmatter;
pub mod slug;
pub mod tree;

use std::path::Path;

pub use error::{ContentError, Result};
pub use frontmatter::{FixSummary, Frontmatter, fix_frontmatter_tree, quote_pub_date};
pub use slug::{DEFAULT_MAX_SLUG_LEN, slugify};
pub use tree::{ContentEntry, ContentTree, CoverageReport, MissingTranslation};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx"];

pub(crate) fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|m| ext.eq_ignore_ascii_case(m))
        })
}
