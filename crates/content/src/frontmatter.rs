use crate::error::{ContentError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DELIMITER: &str = "---";
const PUB_DATE_KEY: &str = "pubDate";

/// `key: value` pairs from the block at the top of a Markdown entry,
/// in file order. Values are stored with surrounding quotes removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    fields: Vec<(String, String)>,
}

impl Frontmatter {
    /// Parse the frontmatter block of `text`.
    ///
    /// Returns `None` when the document does not open with a `---` line or
    /// the block is never closed.
    pub fn parse(text: &str) -> Option<Self> {
        let (start, end) = block_bounds(text)?;
        let fields = text
            .lines()
            .skip(start)
            .take(end - start)
            .filter_map(|line| {
                let (key, value) = line.split_once(':')?;
                let key = key.trim();
                if key.is_empty() || key.starts_with('#') || key.starts_with('-') {
                    return None;
                }
                Some((key.to_string(), unquote(value.trim()).to_string()))
            })
            .collect();

        Some(Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    /// Inline list form only: `tags: ["python", "debugging"]`
    pub fn tags(&self) -> Vec<String> {
        let Some(raw) = self.get("tags") else {
            return Vec::new();
        };
        raw.trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .split(',')
            .map(|t| unquote(t.trim()).to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Publication date, accepting `2025-01-31`, RFC 3339, or
    /// `2025-01-31 10:00:00+00:00`. `None` if absent or unparseable.
    pub fn pub_date(&self) -> Option<NaiveDate> {
        parse_date(self.get(PUB_DATE_KEY)?)
    }

    /// True when `pubDate` is present but cannot be read as a date
    pub fn has_invalid_pub_date(&self) -> bool {
        self.get(PUB_DATE_KEY).is_some() && self.pub_date().is_none()
    }
}

/// Line range `(first, end)` of the frontmatter body, excluding delimiters
fn block_bounds(text: &str) -> Option<(usize, usize)> {
    let mut lines = text.lines().enumerate().skip_while(|(_, l)| l.trim().is_empty());

    let (open, first) = lines.next()?;
    if first.trim() != DELIMITER {
        return None;
    }

    let (close, _) = lines.find(|(_, l)| l.trim() == DELIMITER)?;
    Some((open + 1, close))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%:z") {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Wrap an unquoted `pubDate` value in double quotes.
///
/// Only lines inside the frontmatter block are considered. Returns the
/// rewritten document, or `None` when there is no frontmatter or nothing
/// needed quoting.
pub fn quote_pub_date(text: &str) -> Option<String> {
    let (start, end) = block_bounds(text)?;

    let mut changed = false;
    let rewritten: Vec<String> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i < start || i >= end {
                return line.to_string();
            }
            match quoted_pub_date_line(line) {
                Some(fixed) => {
                    changed = true;
                    fixed
                }
                None => line.to_string(),
            }
        })
        .collect();

    changed.then(|| rewritten.join("\n"))
}

fn quoted_pub_date_line(line: &str) -> Option<String> {
    let (body, cr) = match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    };

    if !body.trim_start().starts_with(PUB_DATE_KEY) {
        return None;
    }
    let (key, value) = body.split_once(':')?;
    if key.trim() != PUB_DATE_KEY {
        return None;
    }

    let value = value.trim();
    if value.is_empty() || value.starts_with('"') || value.starts_with('\'') {
        return None;
    }

    Some(format!("{}: \"{}\"{}", key, value, cr))
}

/// Outcome of a frontmatter repair pass over a directory
#[derive(Debug, Default)]
pub struct FixSummary {
    pub scanned: usize,
    pub fixed: Vec<PathBuf>,
    /// Markdown files with no frontmatter block at all
    pub without_frontmatter: Vec<PathBuf>,
}

/// Apply [`quote_pub_date`] to every Markdown file under `dir`, recursively
pub fn fix_frontmatter_tree(dir: &Path) -> Result<FixSummary> {
    if !dir.is_dir() {
        return Err(ContentError::MissingRoot(dir.to_path_buf()));
    }

    let mut summary = FixSummary::default();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|source| ContentError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !crate::is_markdown(path) {
            continue;
        }

        summary.scanned += 1;
        let text = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;

        if block_bounds(&text).is_none() {
            tracing::warn!(path = %path.display(), "Skipping file without frontmatter");
            summary.without_frontmatter.push(path.to_path_buf());
            continue;
        }

        if let Some(fixed) = quote_pub_date(&text) {
            fs::write(path, fixed).map_err(|e| ContentError::io(path, e))?;
            tracing::debug!(path = %path.display(), "Quoted pubDate");
            summary.fixed.push(path.to_path_buf());
        }
    }

    Ok(summary)
}
