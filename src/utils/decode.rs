//! File-name decoding helpers.
//!
//! Document file names may carry HTML entities (authors name files after
//! post titles, e.g. `Tips &amp; Tricks.mdx`). These helpers decode the
//! entities and strip the document extension so the original title can be
//! recovered for feeds and page listings.

use quick_xml::escape::{resolve_html5_entity, unescape_with};
use std::path::Path;

/// Decode HTML entities in a file name, optionally stripping the
/// `.mdx` extension first.
///
/// Unknown or malformed entities leave the input untouched.
pub fn decode_file_name(name: &str, strip_ext: bool) -> String {
    let name = if strip_ext {
        name.strip_suffix(".mdx").unwrap_or(name)
    } else {
        name
    };

    unescape_with(name, resolve_html5_entity)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| name.to_owned())
}

/// Decode the final component of a path (the file name without `.mdx`).
///
/// Returns `None` for paths without a final component.
pub fn decode_file_stem(path: impl AsRef<Path>) -> Option<String> {
    let name = path.as_ref().file_name()?.to_str()?;
    Some(decode_file_name(name, true))
}
