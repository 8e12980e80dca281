//! Anchor slugs for headings.

/// Derives a URL-safe anchor id from heading text.
///
/// Lowercases, keeps alphanumerics, and collapses every other run of
/// characters to a single dash. Non-ASCII letters are kept as-is rather
/// than transliterated.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
