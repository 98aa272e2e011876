//! Asset copying into the output tree.
//!
//! Assets from the assets directory keep their layout under
//! `output/assets/`, so the paths referenced by injected imports stay
//! resolvable after deployment. Non-document files inside the content
//! directory are copied to their mirrored output location.

use crate::compiler::is_up_to_date;
use crate::config::SiteConfig;
use crate::log;
use anyhow::{Result, anyhow};
use std::fs;
use std::path::Path;

/// Process an asset file from the assets directory.
pub fn process_asset(
    asset_path: &Path,
    config: &SiteConfig,
    clean: bool,
    log_file: bool,
) -> Result<()> {
    let relative = asset_path
        .strip_prefix(config.assets_dir())
        .map_err(|_| anyhow!("file is not in assets directory: {}", asset_path.display()))?
        .to_str()
        .ok_or_else(|| anyhow!("invalid path encoding"))?
        .to_owned();

    let dest = config.output_dir().join("assets").join(&relative);

    if !clean && is_up_to_date(asset_path, &dest) {
        return Ok(());
    }

    if log_file {
        log!("assets"; "{relative}");
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(asset_path, &dest)?;
    Ok(())
}

/// Process a non-document file from the content directory.
pub fn process_rel_asset(
    path: &Path,
    config: &SiteConfig,
    clean: bool,
    log_file: bool,
) -> Result<()> {
    let relative = path
        .strip_prefix(config.content_dir())
        .map_err(|_| anyhow!("file is not in content directory: {}", path.display()))?
        .to_str()
        .ok_or_else(|| anyhow!("invalid path encoding"))?
        .to_owned();

    let dest = config.output_dir().join(&relative);

    if !clean && is_up_to_date(path, &dest) {
        return Ok(());
    }

    if log_file {
        log!("content"; "{relative}");
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(path, dest)?;
    Ok(())
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

    #[test]
    fn test_process_asset_copies_with_layout() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());

        let src = config.assets_dir().join("blog/my-post/hero.png");
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, b"png").unwrap();

        process_asset(&src, &config, false, false).unwrap();

        let dest = config.output_dir().join("assets/blog/my-post/hero.png");
        assert_eq!(fs::read(dest).unwrap(), b"png");
    }

    #[test]
    fn test_process_asset_outside_assets_dir() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());

        let result = process_asset(Path::new("/elsewhere/x.png"), &config, false, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_process_rel_asset_mirrors_content() {
        let tmp = TempDir::new().unwrap();
        let config = config_rooted(tmp.path());

        let src = config.content_dir().join("blog/attachment.zip");
        fs::create_dir_all(src.parent().unwrap()).unwrap();
        fs::write(&src, b"zip").unwrap();

        process_rel_asset(&src, &config, false, false).unwrap();

        let dest = config.output_dir().join("blog/attachment.zip");
        assert_eq!(fs::read(dest).unwrap(), b"zip");
    }
}
