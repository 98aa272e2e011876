//! URL slugification and path utilities.
//!
//! Converts document names and paths to URL-safe formats.

use deunicode::deunicode;
use std::path::Path;

/// Convert text to a URL-safe slug.
///
/// Transliterates to ASCII, lowercases, and joins alphanumeric runs
/// with single hyphens. Everything else acts as a word separator and
/// consecutive separators collapse.
///
/// # Examples
///
/// ```ignore
/// slugify("Hello, World!")   // → "hello-world"
/// slugify("Café au lait")    // → "cafe-au-lait"
/// slugify("My Post (2024)")  // → "my-post-2024"
/// ```
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text).to_lowercase();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Slugify each segment of a path, preserving `/` separators.
///
/// Example: `"Blog Posts/My First Post"` → `"blog-posts/my-first-post"`
pub fn slugify_path(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .components()
        .map(|c| slugify(&c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}
