use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use locale_kit_content::{DEFAULT_MAX_SLUG_LEN, slugify};
use serde::Deserialize;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::new::render_entry;
use super::{content_dir, load_site};

/// One row of an error catalogue CSV
#[derive(Debug, Deserialize)]
struct ErrorRow {
    error_code: String,
    context: String,
    solution_hint: String,
}

#[derive(Debug, Default)]
struct ImportSummary {
    written: Vec<PathBuf>,
    /// Slugs whose entry already existed
    skipped: Vec<String>,
}

/// Create one default-locale entry per row of `csv_path`.
///
/// Columns are `error_code`, `context` and `solution_hint`. Rows whose entry
/// already exists are skipped, so a catalogue can be re-imported as it grows.
pub fn run(path: PathBuf, csv_path: PathBuf) -> Result<()> {
    let config = load_site(&path)?;
    let dir = content_dir(&path, &config).join(config.i18n.locales.default_locale().as_str());

    println!("📥 Importing {}", csv_path.display());

    let summary = import_rows(&csv_path, &dir, Local::now().date_naive())?;

    for file in &summary.written {
        println!("  ✓ {}", file.display());
    }
    for slug in &summary.skipped {
        println!("  ↷ {} (already exists)", slug);
    }

    println!(
        "\n✓ {} created, {} skipped",
        summary.written.len(),
        summary.skipped.len()
    );
    if !summary.written.is_empty() {
        println!(
            "\nRun 'locale-kit fill {}' to seed the other locales",
            path.display()
        );
    }

    Ok(())
}

fn import_rows(csv_path: &Path, dir: &Path, pub_date: NaiveDate) -> Result<ImportSummary> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open {}", csv_path.display()))?;

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut summary = ImportSummary::default();

    for (index, row) in reader.deserialize::<ErrorRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = row.with_context(|| format!("{}: bad row on line {}", csv_path.display(), line))?;

        let slug = slugify(
            &format!("{} {}", row.error_code, row.context),
            DEFAULT_MAX_SLUG_LEN,
        );
        if slug.is_empty() {
            tracing::warn!(line, error_code = %row.error_code, "Row yields an empty slug, skipping");
            continue;
        }

        let file = dir.join(format!("{}.md", slug));
        let mut output = match OpenOptions::new().write(true).create_new(true).open(&file) {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!(slug = %slug, "Entry already exists, skipping");
                summary.skipped.push(slug);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create {}", file.display()));
            }
        };

        let body = render_row(&row, pub_date);
        output
            .write_all(body.as_bytes())
            .with_context(|| format!("Failed to write {}", file.display()))?;

        summary.written.push(file);
    }

    Ok(summary)
}

fn render_row(row: &ErrorRow, pub_date: NaiveDate) -> String {
    let title = format!("Fix {}: {}...", row.error_code, prefix(&row.context, 30));
    let description = format!(
        "Learn how to resolve the {} in Python. {}...",
        row.error_code,
        prefix(&row.solution_hint, 50)
    );
    let tags = [
        "python".to_string(),
        row.error_code.to_lowercase(),
        "debugging".to_string(),
    ];

    render_entry(&title, Some(&description), &tags, pub_date)
}

/// First `n` characters of `s`
fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
