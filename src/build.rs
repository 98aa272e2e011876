//! Site building orchestration.
//!
//! Coordinates document compilation, asset processing, and feed/sitemap
//! generation.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── compile_documents() ──► transform + write each .mdx document
//!     │          (parallel with)
//!     ├── process_assets()    ──► copy asset + content-relative files
//!     │
//!     ├── validate data collections (content/*.json)
//!     │
//!     └── build_rss() + build_sitemap() from collected metadata
//! ```

use crate::compiler::meta::{Pages, validate_data_collection};
use crate::compiler::{
    DOCUMENT_EXT, collect_all_files, compile_documents, process_asset, process_rel_asset,
};
use crate::config::SiteConfig;
use crate::generator::{rss::build_rss, sitemap::build_sitemap};
use crate::log;
use crate::logger::ProgressBars;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Build the entire site, processing documents and assets in parallel.
///
/// Returns the collected page metadata for rss/sitemap generation.
/// If `config.build.clean` is true, clears the output directory first.
pub fn build_site(config: &SiteConfig) -> Result<Pages> {
    let clean = config.build.clean;
    let output_root = config.output_root();
    if clean && output_root.exists() {
        fs::remove_dir_all(&output_root)
            .with_context(|| format!("failed to clean `{}`", output_root.display()))?;
    }

    let (documents, data_files, rel_assets) = partition_content(config);
    let asset_files = collect_all_files(&config.assets_dir());

    log!("build"; "found {} documents", documents.len());

    let progress = ProgressBars::new(&[
        ("content", documents.len()),
        ("assets", asset_files.len() + rel_assets.len()),
    ]);

    let (pages_result, assets_result) = rayon::join(
        || {
            compile_documents(&documents, config, false, || {
                progress.inc_by_name("content");
            })
        },
        || {
            process_assets(&asset_files, &rel_assets, config, clean, || {
                progress.inc_by_name("assets");
            })
        },
    );
    progress.finish();

    let pages = pages_result?;
    assets_result?;

    validate_data_files(&data_files)?;

    let (rss_result, sitemap_result) = rayon::join(
        || build_rss(config, &pages),
        || build_sitemap(config, &pages),
    );
    rss_result?;
    sitemap_result?;

    log!("build"; "compiled {} pages", pages.len());
    Ok(pages)
}

/// Split the content tree into documents, data collections, and
/// relative assets.
///
/// Data collections are the `.json` files sitting directly in the content
/// root; everything that is neither a document nor a data collection gets
/// copied through as an asset.
pub fn partition_content(config: &SiteConfig) -> (Vec<PathBuf>, Vec<PathBuf>, Vec<PathBuf>) {
    let content_dir = config.content_dir();
    let mut documents = Vec::new();
    let mut data_files = Vec::new();
    let mut rel_assets = Vec::new();

    for path in collect_all_files(&content_dir) {
        if path.extension().is_some_and(|ext| ext == DOCUMENT_EXT) {
            documents.push(path);
        } else if path.parent() == Some(content_dir.as_path())
            && path.extension().is_some_and(|ext| ext == "json")
        {
            data_files.push(path);
        } else {
            rel_assets.push(path);
        }
    }

    documents.sort();
    data_files.sort();
    rel_assets.sort();
    (documents, data_files, rel_assets)
}

/// Copy asset and content-relative files into the output tree.
fn process_assets(
    asset_files: &[PathBuf],
    rel_assets: &[PathBuf],
    config: &SiteConfig,
    clean: bool,
    on_progress: impl Fn() + Sync,
) -> Result<()> {
    asset_files.par_iter().try_for_each(|path| {
        let result = process_asset(path, config, clean, false);
        on_progress();
        result
    })?;

    rel_assets.par_iter().try_for_each(|path| {
        let result = process_rel_asset(path, config, clean, false);
        on_progress();
        result
    })
}

/// Validate the content root's data-collection files.
fn validate_data_files(data_files: &[PathBuf]) -> Result<()> {
    for path in data_files {
        let name = collection_name(path);
        let json = fs::read_to_string(path)
            .with_context(|| format!("cannot read `{}`", path.display()))?;
        let entries = validate_data_collection(name, &json)
            .with_context(|| format!("invalid data collection `{}`", path.display()))?;
        log!("data"; "{name}: {entries} entries");
    }
    Ok(())
}

/// Data-collection name: the file stem of its JSON document.
fn collection_name(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_partition_content() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());
        let content = config.content_dir();

        write(&content.join("blog/post.mdx"), "x");
        write(&content.join("ctfs.json"), "[]");
        write(&content.join("blog/attachment.zip"), "x");
        // nested json is an asset, not a data collection
        write(&content.join("blog/data.json"), "[]");

        let (documents, data_files, rel_assets) = partition_content(&config);

        assert_eq!(documents.len(), 1);
        assert_eq!(data_files.len(), 1);
        assert!(data_files[0].ends_with("ctfs.json"));
        assert_eq!(rel_assets.len(), 2);
    }

    #[test]
    fn test_build_site_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let mut config = config_rooted(tmp.path());
        config.base.title = "Test".into();
        config.base.description = "Test site".into();
        config.base.url = Some("https://example.com".to_string());
        config.build.rss.enable = true;

        let content = config.content_dir();
        write(
            &content.join("blog/first-post.mdx"),
            "---\ndescription: First\npubDate: 2024-01-01\n---\n# First\n",
        );
        write(
            &content.join("ctfs.json"),
            r#"[{"ctfName": "picoCTF", "ctfLink": "https://picoctf.org"}]"#,
        );
        write(
            &config.assets_dir().join("blog/first-post/hero.png"),
            "png",
        );

        let pages = build_site(&config).unwrap();
        assert_eq!(pages.len(), 1);

        let emitted = fs::read_to_string(
            config.output_dir().join("blog/first-post/index.mdx"),
        )
        .unwrap();
        assert!(emitted.contains("import hero from"));

        assert!(config.output_dir().join("assets/blog/first-post/hero.png").exists());
        assert!(config.output_dir().join("rss.xml").exists());
        assert!(config.output_dir().join("sitemap.xml").exists());
    }

    #[test]
    fn test_build_site_fails_on_bad_data_collection() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());

        write(
            &config.content_dir().join("ctfs.json"),
            r#"[{"ctfName": "x", "ctfLink": "not-a-url"}]"#,
        );

        assert!(build_site(&config).is_err());
    }
}
