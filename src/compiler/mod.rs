//! Compilation pipeline for MDX content.
//!
//! This module orchestrates the per-document build pipeline:
//!
//! - **documents**: Compile `.mdx` files and write transformed output
//! - **meta**: Frontmatter records, collection schemas, page metadata
//! - **imports**: Auto-import transform (asset discovery + tree mutation)
//! - **esm**: Import statement rendering for the document tree
//! - **diagnostics**: Structured warning sink for the transform
//! - **assets**: Copy static assets into the output tree
//!
//! # Build Flow
//!
//! ```text
//! collect_all_files() ──► compile_document() ──► process_asset()
//!        │                      │                     │
//!        ▼                      ▼                     ▼
//!    .mdx paths         transformed output       asset files
//!                       + PageMeta (feed/sitemap)
//! ```

pub mod assets;
pub mod diagnostics;
pub mod documents;
pub mod esm;
pub mod imports;
pub mod meta;

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

// ============================================================================
// Public API
// ============================================================================

pub use assets::{process_asset, process_rel_asset};
pub use documents::{compile_document, compile_documents};

/// Extension of compilable documents. Files with any other extension pass
/// through the pipeline untransformed.
pub const DOCUMENT_EXT: &str = "mdx";

// ============================================================================
// Errors
// ============================================================================

/// Per-document compile errors.
///
/// Everything here is fatal for the affected document: a path that cannot
/// be categorized, unparsable frontmatter, or unparsable MDX all indicate
/// structural problems rather than per-asset anomalies (those are handled
/// as non-fatal warnings by the diagnostics sink).
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not under the content directory: `{0}`")]
    OutsideContentRoot(PathBuf),

    #[error("cannot derive a collection for `{0}`")]
    MissingCollection(PathBuf),

    #[error("cannot derive a base name for `{0}`")]
    MissingBaseName(PathBuf),

    #[error("invalid frontmatter in `{path}`")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("frontmatter validation failed for `{path}`: {reason}")]
    Schema { path: PathBuf, reason: String },

    #[error("mdx parse error in `{path}`: {message}")]
    Parse { path: PathBuf, message: String },
}

// ============================================================================
// Shared utilities
// ============================================================================

/// Files to ignore during directory traversal
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect all files from a directory recursively.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Check if destination is up-to-date compared to source.
pub fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let Ok(src_meta) = src.metadata() else {
        return false;
    };
    let Ok(dst_meta) = dst.metadata() else {
        return false;
    };

    let Ok(src_time) = src_meta.modified() else {
        return false;
    };
    let Ok(dst_time) = dst_meta.modified() else {
        return false;
    };

    src_time <= dst_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_all_files_skips_ignored() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("post.mdx"), "hello").unwrap();
        fs::write(dir.path().join(".DS_Store"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/photo.png"), "").unwrap();

        let mut files = collect_all_files(dir.path());
        files.sort();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| !f.ends_with(".DS_Store")));
    }

    #[test]
    fn test_collect_all_files_missing_dir() {
        let files = collect_all_files(Path::new("/nonexistent/emdex-test"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_is_up_to_date_missing_dst() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.mdx");
        fs::write(&src, "x").unwrap();

        assert!(!is_up_to_date(&src, &dir.path().join("missing")));
    }
}
