//! Auto-import transform for MDX document trees.
//!
//! Given a parsed document and the path it came from, discovers the asset
//! files sitting in the document's asset directory and prepends one import
//! declaration per asset to the tree, plus the configured helper-component
//! imports. Authors can then reference local media by the derived
//! identifier without writing import statements.
//!
//! The transform runs in three steps, single pass:
//!
//! 1. **resolve**: derive `(collection, asset directory)` from the
//!    document's path and frontmatter
//! 2. **discover**: list the asset directory and synthesize one identifier
//!    per entry, skipping entries that cannot be named or that collide
//! 3. **mutate**: prepend import nodes so the document starts with the
//!    component imports, then the asset imports, then its original content
//!
//! Asset anomalies (unnamable entries, identifier collisions) are recorded
//! in the [`Diagnostics`] sink and never abort the build. A path that
//! cannot be categorized at all is a structural problem and fails the
//! document.

use crate::compiler::diagnostics::{Diagnostics, Warning};
use crate::compiler::esm;
use crate::compiler::meta::Frontmatter;
use crate::compiler::{DOCUMENT_EXT, DocumentError};
use crate::config::SiteConfig;
use crate::utils::slug::slugify;
use markdown::mdast::Node;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// File descriptor
// ============================================================================

/// Identifying metadata for one in-flight document: the ordered history of
/// paths it has been known by (first entry is the canonical source path)
/// and its frontmatter record.
#[derive(Debug, Default)]
pub struct SourceFile {
    pub history: Vec<PathBuf>,
    pub frontmatter: Option<Frontmatter>,
}

impl SourceFile {
    pub fn new(path: PathBuf, frontmatter: Option<Frontmatter>) -> Self {
        Self {
            history: vec![path],
            frontmatter,
        }
    }

    /// The canonical source path (first history entry).
    pub fn canonical(&self) -> Option<&PathBuf> {
        self.history.first()
    }

    /// Whether any known path carries the document extension.
    fn is_document(&self) -> bool {
        self.history
            .iter()
            .any(|p| p.extension().is_some_and(|ext| ext == DOCUMENT_EXT))
    }
}

// ============================================================================
// Path resolution
// ============================================================================

/// The logical identity of a document within the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionIdentity {
    /// First path segment under the content root.
    pub collection: String,

    /// Per-document asset subdirectory. `None` for flat collections,
    /// whose assets sit directly under the collection folder.
    pub asset_dir: Option<String>,
}

impl CollectionIdentity {
    /// The on-disk directory searched for this document's assets.
    pub fn search_dir(&self, config: &SiteConfig) -> PathBuf {
        let base = config.assets_dir().join(&self.collection);
        match &self.asset_dir {
            Some(dir) => base.join(dir),
            None => base,
        }
    }
}

/// Derive `(collection, asset directory)` from a document path.
///
/// The asset directory is the slug of the document's base file name,
/// unless the frontmatter supplies an explicit `url` override (used
/// verbatim), or the collection is flat (no per-document directory).
pub fn resolve_identity(
    path: &Path,
    frontmatter: Option<&Frontmatter>,
    config: &SiteConfig,
) -> Result<CollectionIdentity, DocumentError> {
    let rel = path
        .strip_prefix(config.content_dir())
        .map_err(|_| DocumentError::OutsideContentRoot(path.to_path_buf()))?;

    let mut components = rel.iter();
    let collection = components
        .next()
        .and_then(|c| c.to_str())
        .filter(|_| components.next().is_some())
        .ok_or_else(|| DocumentError::MissingCollection(path.to_path_buf()))?
        .to_owned();

    if config.collections.is_flat(&collection) {
        return Ok(CollectionIdentity {
            collection,
            asset_dir: None,
        });
    }

    let asset_dir = document_slug(path, frontmatter)?;

    Ok(CollectionIdentity {
        collection,
        asset_dir: Some(asset_dir),
    })
}

/// Per-document slug: the frontmatter `url` override used verbatim, or
/// the slug of the document's base file name.
///
/// Also the URL slug of the document's compiled page, so asset directories
/// and page URLs stay in agreement for nested collections.
pub fn document_slug(
    path: &Path,
    frontmatter: Option<&Frontmatter>,
) -> Result<String, DocumentError> {
    if let Some(url) = frontmatter.and_then(Frontmatter::url_override) {
        return Ok(url.to_owned());
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DocumentError::MissingBaseName(path.to_path_buf()))?;

    Ok(slugify(stem))
}

// ============================================================================
// Asset discovery
// ============================================================================

/// One discovered asset: a synthesized identifier bound to its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetImport {
    pub name: String,
    pub path: PathBuf,
}

/// List `dir` and synthesize one identifier per entry.
///
/// Direct entries only (files and directories); dotfiles are not
/// importable assets. Listing order is lexicographic by path so collision
/// tie-breaking is reproducible across filesystems. A missing directory
/// means zero assets, not an error.
pub fn discover_assets(dir: &Path, diagnostics: &mut Diagnostics) -> Vec<AssetImport> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            !path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
        })
        .collect();
    paths.sort();

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut assets = Vec::with_capacity(paths.len());

    for path in paths {
        let Some(name) = derive_identifier(&path) else {
            diagnostics.warn(Warning::UnnamableAsset { asset: path });
            continue;
        };

        // First entry wins; no renaming or suffixing is attempted.
        if let Some(kept) = seen.get(&name) {
            diagnostics.warn(Warning::DuplicateIdentifier {
                name,
                kept: kept.clone(),
                skipped: path,
            });
            continue;
        }

        seen.insert(name.clone(), path.clone());
        assets.push(AssetImport { name, path });
    }

    assets
}

/// Synthesize an identifier from an asset path.
///
/// Strips a trailing `.mdx`, takes the final path component up to its
/// first `.`, and camel-cases the result. Identifiers must not start
/// with a digit, so those get an underscore prefix. Returns `None` when
/// nothing identifier-like remains.
fn derive_identifier(path: &Path) -> Option<String> {
    let path_str = path.to_string_lossy();
    let trimmed = path_str.strip_suffix(".mdx").unwrap_or(&path_str);
    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    let stem = base.split('.').next().unwrap_or(base);

    let name = camel_case(stem);
    if name.is_empty() {
        return None;
    }

    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        Some(format!("_{name}"))
    } else {
        Some(name)
    }
}

/// Camel-case on non-alphanumeric word boundaries.
///
/// Consecutive separators collapse; the first word is lowercased, each
/// later word starts uppercase.
fn camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = false;

    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_boundary && !out.is_empty() {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_boundary = false;
        } else {
            at_boundary = true;
        }
    }

    out
}

// ============================================================================
// Tree mutation
// ============================================================================

/// Prepend import nodes to the tree.
///
/// Asset imports are prepended in reverse discovery order, then the
/// configured imports in reverse configuration order, so the document
/// reads: configured imports, asset imports, original content. Existing
/// children are never reordered or removed.
fn prepend_imports(
    tree: &mut Node,
    assets: &[AssetImport],
    additionals: &[crate::config::ImportSpec],
) -> usize {
    let Some(children) = tree.children_mut() else {
        return 0;
    };

    for asset in assets.iter().rev() {
        children.insert(0, esm::default_import(&asset.name, &asset.path));
    }

    for spec in additionals.iter().rev() {
        children.insert(0, esm::import_node(spec));
    }

    assets.len() + additionals.len()
}

// ============================================================================
// Transform entry point
// ============================================================================

/// Apply the auto-import transform to one document tree.
///
/// Non-MDX files are left untouched (`Ok(0)`). Otherwise returns the
/// number of import nodes prepended: one per uniquely-nameable asset in
/// the document's asset directory, plus one per configured import. The
/// tree is mutated in place.
///
/// Not idempotent: every invocation prepends again. The pipeline invokes
/// it exactly once per document.
pub fn auto_import(
    tree: &mut Node,
    file: &SourceFile,
    config: &SiteConfig,
    diagnostics: &mut Diagnostics,
) -> Result<usize, DocumentError> {
    if !file.is_document() {
        return Ok(0);
    }
    let Some(path) = file.canonical() else {
        return Ok(0);
    };

    let identity = resolve_identity(path, file.frontmatter.as_ref(), config)?;
    let assets = discover_assets(&identity.search_dir(config), diagnostics);

    Ok(prepend_imports(tree, &assets, &config.collections.imports))
}

// ============================================================================
// Tests
// ============================================================================
