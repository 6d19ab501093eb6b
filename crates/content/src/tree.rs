use crate::error::{ContentError, Result};
use locale_kit_core::{Locale, LocaleSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One Markdown entry of a localized collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentEntry {
    pub locale: Locale,
    pub slug: String,
    pub path: PathBuf,
}

/// A default-locale entry with no counterpart in `locale`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingTranslation {
    pub locale: Locale,
    pub slug: String,
    /// The default-locale file the translation would be made from
    pub source: PathBuf,
}

/// Translation coverage of a collection relative to its default locale
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub default_locale: Locale,
    /// Entry counts per locale, in configuration order
    pub counts: Vec<(Locale, usize)>,
    pub missing: Vec<MissingTranslation>,
    /// Entries in a non-default locale whose slug the default locale lacks
    pub orphaned: Vec<ContentEntry>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// A collection laid out as `<root>/<locale>/<slug>.md`
#[derive(Debug, Clone)]
pub struct ContentTree {
    root: PathBuf,
    locales: LocaleSet,
    // slug -> file, per locale in configuration order
    by_locale: Vec<(Locale, BTreeMap<String, PathBuf>)>,
}

impl ContentTree {
    /// Scan the locale directories directly under `root`.
    ///
    /// A locale without a directory simply has no entries. Directories named
    /// after locales that are not configured are ignored.
    pub fn scan(root: impl AsRef<Path>, locales: &LocaleSet) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ContentError::MissingRoot(root.to_path_buf()));
        }

        let mut by_locale = Vec::with_capacity(locales.len());
        for locale in locales.iter() {
            let dir = root.join(locale.as_str());
            let entries = if dir.is_dir() {
                scan_locale_dir(&dir)?
            } else {
                tracing::debug!(locale = %locale, dir = %dir.display(), "No content directory for locale");
                BTreeMap::new()
            };
            by_locale.push((locale.clone(), entries));
        }

        tracing::debug!(
            root = %root.display(),
            entries = by_locale.iter().map(|(_, e)| e.len()).sum::<usize>(),
            "Scanned content tree"
        );

        Ok(Self {
            root: root.to_path_buf(),
            locales: locales.clone(),
            by_locale,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every entry, grouped by locale in configuration order, slugs sorted
    pub fn entries(&self) -> Vec<ContentEntry> {
        self.by_locale
            .iter()
            .flat_map(|(locale, entries)| {
                entries.iter().map(move |(slug, path)| ContentEntry {
                    locale: locale.clone(),
                    slug: slug.clone(),
                    path: path.clone(),
                })
            })
            .collect()
    }

    /// Sorted slugs present in `locale`
    pub fn slugs(&self, locale: &Locale) -> Vec<&str> {
        self.locale_entries(locale)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has(&self, locale: &Locale, slug: &str) -> bool {
        self.locale_entries(locale)
            .is_some_and(|entries| entries.contains_key(slug))
    }

    pub fn coverage(&self) -> CoverageReport {
        let default_locale = self.locales.default_locale().clone();
        let empty = BTreeMap::new();
        let defaults = self.locale_entries(&default_locale).unwrap_or(&empty);

        let mut missing = Vec::new();
        let mut orphaned = Vec::new();

        for locale in self.locales.non_default() {
            let entries = self.locale_entries(locale).unwrap_or(&empty);
            for (slug, source) in defaults {
                if !entries.contains_key(slug) {
                    missing.push(MissingTranslation {
                        locale: locale.clone(),
                        slug: slug.clone(),
                        source: source.clone(),
                    });
                }
            }
            for (slug, path) in entries {
                if !defaults.contains_key(slug) {
                    orphaned.push(ContentEntry {
                        locale: locale.clone(),
                        slug: slug.clone(),
                        path: path.clone(),
                    });
                }
            }
        }

        CoverageReport {
            default_locale,
            counts: self
                .by_locale
                .iter()
                .map(|(l, e)| (l.clone(), e.len()))
                .collect(),
            missing,
            orphaned,
        }
    }

    /// Copy each missing translation's default-locale file into place so the
    /// localized route exists, creating locale directories as needed. The
    /// copy keeps the source file name, extension included.
    ///
    /// Existing files are never overwritten, even one created between the
    /// audit and the copy. Returns the files written.
    pub fn fill_missing(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for gap in self.coverage().missing {
            let Some(file_name) = gap.source.file_name() else {
                continue;
            };
            let dir = self.root.join(gap.locale.as_str());
            let target = dir.join(file_name);

            fs::create_dir_all(&dir).map_err(|e| ContentError::io(&dir, e))?;
            if !copy_new(&gap.source, &target)? {
                tracing::debug!(target = %target.display(), "Translation already present, skipping");
                continue;
            }

            tracing::info!(
                locale = %gap.locale,
                slug = %gap.slug,
                target = %target.display(),
                "Filled missing translation with default-locale content"
            );
            written.push(target);
        }

        Ok(written)
    }

    fn locale_entries(&self, locale: &Locale) -> Option<&BTreeMap<String, PathBuf>> {
        self.by_locale
            .iter()
            .find(|(l, _)| l == locale)
            .map(|(_, entries)| entries)
    }
}

/// Copy `source` to a `target` that must not exist yet. Returns false when
/// `target` is already there.
fn copy_new(source: &Path, target: &Path) -> Result<bool> {
    let mut output = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(ContentError::io(target, e)),
    };
    let mut input = File::open(source).map_err(|e| ContentError::io(source, e))?;
    io::copy(&mut input, &mut output).map_err(|e| ContentError::io(target, e))?;
    Ok(true)
}

fn scan_locale_dir(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut entries = BTreeMap::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| ContentError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !crate::is_markdown(path) {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(path = %path.display(), "Skipping entry with non UTF-8 name");
            continue;
        };

        if let Some(previous) = entries.insert(slug.to_string(), path.to_path_buf()) {
            tracing::warn!(
                slug,
                kept = %path.display(),
                dropped = %previous.display(),
                "Two entries share one slug"
            );
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn locales() -> LocaleSet {
        LocaleSet::new(["en", "pt", "es"], "en").unwrap()
    }

    fn locale(id: &str) -> Locale {
        Locale::new(id).unwrap()
    }

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "en/fix-keyerror.md", "---\ntitle: KeyError\n---\nen body\n");
        write(dir.path(), "en/fix-typeerror.md", "---\ntitle: TypeError\n---\n");
        write(dir.path(), "pt/fix-keyerror.md", "---\ntitle: KeyError pt\n---\n");
        write(dir.path(), "pt/old-post.md", "---\ntitle: old\n---\n");
        write(dir.path(), "pt/notes.txt", "ignored");
        write(dir.path(), "fr/fix-keyerror.md", "ignored locale");
        dir
    }

    #[test]
    fn test_scan_entries() {
        let dir = sample_tree();
        let tree = ContentTree::scan(dir.path(), &locales()).unwrap();

        assert_eq!(tree.slugs(&locale("en")), vec!["fix-keyerror", "fix-typeerror"]);
        assert_eq!(tree.slugs(&locale("pt")), vec!["fix-keyerror", "old-post"]);
        assert!(tree.slugs(&locale("es")).is_empty());
        assert!(tree.has(&locale("pt"), "fix-keyerror"));
        assert!(!tree.has(&locale("fr"), "fix-keyerror"));

        let entries = tree.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].locale.as_str(), "en");
        assert_eq!(entries[0].path, dir.path().join("en/fix-keyerror.md"));
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = ContentTree::scan(dir.path().join("nope"), &locales());
        assert!(matches!(result, Err(ContentError::MissingRoot(_))));
    }

    #[test]
    fn test_coverage() {
        let dir = sample_tree();
        let tree = ContentTree::scan(dir.path(), &locales()).unwrap();
        let report = tree.coverage();

        assert_eq!(report.default_locale.as_str(), "en");
        assert!(!report.is_complete());

        let missing: Vec<(&str, &str)> = report
            .missing
            .iter()
            .map(|m| (m.locale.as_str(), m.slug.as_str()))
            .collect();
        assert_eq!(
            missing,
            vec![
                ("pt", "fix-typeerror"),
                ("es", "fix-keyerror"),
                ("es", "fix-typeerror"),
            ]
        );

        assert_eq!(report.orphaned.len(), 1);
        assert_eq!(report.orphaned[0].slug, "old-post");

        let counts: Vec<(&str, usize)> = report
            .counts
            .iter()
            .map(|(l, n)| (l.as_str(), *n))
            .collect();
        assert_eq!(counts, vec![("en", 2), ("pt", 2), ("es", 0)]);
    }

    #[test]
    fn test_fill_missing() {
        let dir = sample_tree();
        let tree = ContentTree::scan(dir.path(), &locales()).unwrap();
        let written = tree.fill_missing().unwrap();

        assert_eq!(written.len(), 3);
        assert!(dir.path().join("es/fix-keyerror.md").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("es/fix-keyerror.md")).unwrap(),
            "---\ntitle: KeyError\n---\nen body\n"
        );

        // existing translation untouched
        assert_eq!(
            fs::read_to_string(dir.path().join("pt/fix-keyerror.md")).unwrap(),
            "---\ntitle: KeyError pt\n---\n"
        );

        let rescanned = ContentTree::scan(dir.path(), &locales()).unwrap();
        assert!(rescanned.coverage().is_complete());
        assert!(rescanned.fill_missing().unwrap().is_empty());
    }

    #[test]
    fn test_fill_missing_never_overwrites() {
        let dir = sample_tree();
        let tree = ContentTree::scan(dir.path(), &locales()).unwrap();

        // appears after the scan
        write(dir.path(), "es/fix-keyerror.md", "translated by hand");

        let written = tree.fill_missing().unwrap();
        assert!(!written.contains(&dir.path().join("es/fix-keyerror.md")));
        assert_eq!(
            fs::read_to_string(dir.path().join("es/fix-keyerror.md")).unwrap(),
            "translated by hand"
        );
        assert_eq!(
            written,
            vec![
                dir.path().join("pt/fix-typeerror.md"),
                dir.path().join("es/fix-typeerror.md"),
            ]
        );
    }

    #[test]
    fn test_fill_missing_keeps_source_file_name() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "en/interactive.mdx", "---\ntitle: MDX\n---\n<Demo />\n");
        let tree = ContentTree::scan(dir.path(), &locales()).unwrap();

        let written = tree.fill_missing().unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("pt/interactive.mdx"),
                dir.path().join("es/interactive.mdx"),
            ]
        );
        assert!(!dir.path().join("pt/interactive.md").exists());

        let rescanned = ContentTree::scan(dir.path(), &locales()).unwrap();
        assert!(rescanned.has(&locale("es"), "interactive"));
    }
}
