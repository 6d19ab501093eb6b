use anyhow::{Context, Result};
use locale_kit_content::{ContentTree, CoverageReport, Frontmatter};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::{load_site, load_tree, print_json};

/// A content file whose frontmatter the site build would choke on
#[derive(Debug, Serialize, PartialEq, Eq)]
struct FrontmatterIssue {
    path: PathBuf,
    problem: &'static str,
}

#[derive(Debug, Serialize)]
struct AuditReport {
    coverage: CoverageReport,
    frontmatter: Vec<FrontmatterIssue>,
}

/// Report translation coverage and frontmatter problems.
///
/// With `strict`, missing translations make the command fail so it can gate
/// a build.
pub fn run(path: PathBuf, strict: bool, json: bool) -> Result<()> {
    let config = load_site(&path)?;
    let tree = load_tree(&path, &config)?;

    let report = AuditReport {
        coverage: tree.coverage(),
        frontmatter: frontmatter_issues(&tree)?,
    };

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    if strict && !report.coverage.is_complete() {
        anyhow::bail!(
            "{} translation(s) missing",
            report.coverage.missing.len()
        );
    }

    Ok(())
}

fn print_report(report: &AuditReport) {
    let coverage = &report.coverage;

    println!("📚 Entries per locale:");
    for (locale, count) in &coverage.counts {
        let marker = if *locale == coverage.default_locale {
            " (default)"
        } else {
            ""
        };
        println!("   {}{}: {}", locale, marker, count);
    }

    if coverage.missing.is_empty() {
        println!("\n✓ Every {} entry is translated", coverage.default_locale);
    } else {
        println!("\n⚠ Missing translations ({}):", coverage.missing.len());
        for gap in &coverage.missing {
            println!("   {}/{}", gap.locale, gap.slug);
        }
    }

    if !coverage.orphaned.is_empty() {
        println!(
            "\n⚠ Entries with no {} original ({}):",
            coverage.default_locale,
            coverage.orphaned.len()
        );
        for entry in &coverage.orphaned {
            println!("   {}/{}", entry.locale, entry.slug);
        }
    }

    if !report.frontmatter.is_empty() {
        println!("\n⚠ Frontmatter problems ({}):", report.frontmatter.len());
        for issue in &report.frontmatter {
            println!("   {}: {}", issue.path.display(), issue.problem);
        }
    }
}

fn frontmatter_issues(tree: &ContentTree) -> Result<Vec<FrontmatterIssue>> {
    let mut issues = Vec::new();

    for entry in tree.entries() {
        let text = fs::read_to_string(&entry.path)
            .with_context(|| format!("Failed to read {}", entry.path.display()))?;

        let problem = match Frontmatter::parse(&text) {
            None => Some("no frontmatter block"),
            Some(fm) if fm.title().is_none() => Some("missing title"),
            Some(fm) if fm.description().is_none() => Some("missing description"),
            Some(fm) if fm.has_invalid_pub_date() => Some("unreadable pubDate"),
            Some(_) => None,
        };

        if let Some(problem) = problem {
            issues.push(FrontmatterIssue {
                path: entry.path,
                problem,
            });
        }
    }

    Ok(issues)
}
