/// Default slug length used when naming generated articles
pub const DEFAULT_MAX_SLUG_LEN: usize = 50;

/// Turn free text into a URL-safe slug.
///
/// Lowercases, drops quote characters, and joins runs of alphanumerics with
/// single hyphens. When `max_len` is non-zero the slug is cut to at most that
/// many characters and any hyphen left dangling at the end is removed.
///
/// ```text
/// slugify("KeyError dict lookup", 50)                 → "keyerror-dict-lookup"
/// slugify("TypeError: 'NoneType' object", 50)         → "typeerror-nonetype-object"
/// slugify("  --Hello,   World!-- ", 50)               → "hello-world"
/// ```
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c == '\'' || c == '"' || c == '\u{2019}' {
            continue;
        }
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if max_len > 0 && slug.chars().count() > max_len {
        slug = slug.chars().take(max_len).collect();
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}
