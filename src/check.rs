//! Content validation without output.
//!
//! `emdex check` runs every document through the full compile pipeline in
//! dry-run mode: frontmatter schemas, MDX parsing, and import resolution
//! all execute, diagnostics are reported, and nothing is written.

use crate::build::partition_content;
use crate::compiler::compile_document;
use crate::compiler::diagnostics::Diagnostics;
use crate::compiler::meta::validate_data_collection;
use crate::config::SiteConfig;
use crate::log;
use anyhow::{Result, bail};
use rayon::prelude::*;
use std::fs;

/// Validate all content. Fails if any document or data collection is
/// structurally broken; import diagnostics are reported but non-fatal.
pub fn check_site(config: &SiteConfig) -> Result<()> {
    let (documents, data_files, _rel_assets) = partition_content(config);

    log!("check"; "checking {} documents", documents.len());

    let results: Vec<_> = documents
        .par_iter()
        .map(|path| {
            let mut diagnostics = Diagnostics::new();
            let result = compile_document(path, config, true, &mut diagnostics);
            (path, result, diagnostics)
        })
        .collect();

    let mut errors = 0usize;
    let mut warnings = 0usize;
    for (path, result, mut diagnostics) in results {
        warnings += diagnostics.warnings().len();
        diagnostics.flush(path);
        if let Err(err) = result {
            errors += 1;
            log!("error"; "{err:#}");
        }
    }

    for path in &data_files {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|json| validate_data_collection(name, &json))
        {
            Ok(entries) => log!("data"; "{name}: {entries} entries"),
            Err(err) => {
                errors += 1;
                log!("error"; "{}: {err:#}", path.display());
            }
        }
    }

    log!("check"; "{} documents, {errors} error(s), {warnings} warning(s)", documents.len());

    if errors > 0 {
        bail!("check failed with {errors} error(s)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_rooted(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_check_passes_on_valid_site() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());

        write(
            &config.content_dir().join("blog/ok.mdx"),
            "---\ndescription: fine\n---\nbody\n",
        );

        assert!(check_site(&config).is_ok());
        // dry run: nothing written
        assert!(!config.output_dir().exists());
    }

    #[test]
    fn test_check_fails_on_schema_violation() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());

        write(
            &config.content_dir().join("book-review/bad.mdx"),
            "---\nrating: 9.0\nread: 2024-01-01\n---\nbody\n",
        );

        assert!(check_site(&config).is_err());
    }

    #[test]
    fn test_check_warnings_are_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());

        write(
            &config.content_dir().join("blog/post.mdx"),
            "---\ndescription: ok\n---\nbody\n",
        );
        let assets = config.assets_dir().join("blog/post");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("Photo.png"), "x").unwrap();
        fs::write(assets.join("photo.jpg"), "x").unwrap();

        assert!(check_site(&config).is_ok());
    }
}
