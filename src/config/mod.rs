//! Site configuration management for `emdex.toml`.
//!
//! # Sections
//!
//! | Section         | Purpose                                         |
//! |-----------------|-------------------------------------------------|
//! | `[base]`        | Site metadata (title, author, url)              |
//! | `[build]`       | Build paths, rss, sitemap                       |
//! | `[collections]` | Flat collections and always-injected imports    |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "My Blog"
//! description = "A personal blog"
//! url = "https://example.com"
//!
//! [build]
//! content = "src/content"
//! output = "dist"
//!
//! [build.rss]
//! enable = true
//!
//! [collections]
//! flat = ["book-review", "ctf-write-up"]
//! ```

mod base;
mod build;
mod collections;
pub mod defaults;
mod error;
mod paths;

// Re-export public types used by other modules
pub use collections::{ImportSpec, NamedImport};
pub use paths::PathResolver;

// Internal imports used in this module
use base::BaseConfig;
use build::BuildConfig;
use collections::CollectionsConfig;
use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::Result;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing emdex.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Collection settings
    #[serde(default)]
    pub collections: CollectionsConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf());
    }

    /// Content directory resolved against the project root.
    pub fn content_dir(&self) -> PathBuf {
        self.get_root().join(&self.build.content)
    }

    /// Assets directory resolved against the project root.
    pub fn assets_dir(&self) -> PathBuf {
        self.get_root().join(&self.build.assets)
    }

    /// Output root resolved against the project root (without path_prefix).
    pub fn output_root(&self) -> PathBuf {
        self.get_root().join(&self.build.output)
    }

    /// Path resolver for output and URL paths.
    pub fn paths(&self) -> PathResolver<'_> {
        PathResolver::new(&self.build.output, &self.build.path_prefix)
    }

    /// Output directory (with root and path_prefix applied).
    pub fn output_dir(&self) -> PathBuf {
        self.get_root().join(self.paths().output_dir())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        // Determine the final root path based on command
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                let base = cli
                    .root
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| self.get_root().to_owned());
                base.join(name)
            }
            _ => cli
                .root
                .as_ref()
                .cloned()
                .unwrap_or_else(|| self.get_root().to_owned()),
        };
        self.set_root(&root);
        self.config_path = root.join(&cli.config);

        // Path overrides
        if let Some(content) = &cli.content {
            self.build.content = content.clone();
        }
        if let Some(assets) = &cli.assets {
            self.build.assets = assets.clone();
        }
        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }

        // Build argument overrides
        if let Commands::Build { build_args } = &cli.command {
            if build_args.clean {
                self.build.clean = true;
            }
            if let Some(rss) = build_args.rss {
                self.build.rss.enable = rss;
            }
            if let Some(sitemap) = build_args.sitemap {
                self.build.sitemap.enable = sitemap;
            }
            if let Some(base_url) = &build_args.base_url {
                self.base.url = Some(base_url.clone());
            }
        }
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        if self.build.rss.enable && self.base.url.is_none() {
            return Err(ConfigError::Validation(
                "[build.rss].enable requires [base].url to be set".into(),
            )
            .into());
        }

        if let Some(url) = &self.base.url
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            return Err(ConfigError::Validation(format!(
                "[base].url must start with http:// or https://, got `{url}`"
            ))
            .into());
        }

        Ok(())
    }
}
