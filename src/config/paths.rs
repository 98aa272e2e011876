//! Centralized path resolution for consistent URL and output path generation.
//!
//! Keeps `path_prefix` handling in one place instead of scattering manual
//! joins through the build pipeline.

use std::path::{Path, PathBuf};

/// Resolver for output paths and URL paths.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    /// Output root directory (without path_prefix)
    output: &'a Path,
    /// Path prefix for subdirectory deployment
    prefix: &'a Path,
}

impl<'a> PathResolver<'a> {
    #[inline]
    pub const fn new(output: &'a Path, prefix: &'a Path) -> Self {
        Self { output, prefix }
    }

    /// Content output directory (with path_prefix).
    ///
    /// Where compiled documents, assets, and generated files are placed.
    #[inline]
    pub fn output_dir(&self) -> PathBuf {
        self.output.join(self.prefix)
    }

    /// Generate a URL path for a relative path in the output directory.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // With prefix "my-project":
    /// paths.url_for_rel_path("blog/hello/") → "/my-project/blog/hello/"
    /// ```
    pub fn url_for_rel_path<P: AsRef<Path>>(&self, rel_path: P) -> String {
        let joined = self.prefix.join(rel_path);
        let path_str = joined.to_string_lossy().replace('\\', "/");
        format!("/{path_str}")
    }
}
