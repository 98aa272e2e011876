//! Per-document compilation.
//!
//! Each `.mdx` file goes through: frontmatter split and validation, MDX
//! parse to a document tree, the auto-import transform, and emission of
//! the transformed document into the output tree.

use crate::compiler::diagnostics::Diagnostics;
use crate::compiler::imports::{SourceFile, auto_import};
use crate::compiler::is_up_to_date;
use crate::compiler::meta::{Frontmatter, PageMeta, Pages, validate_frontmatter};
use crate::compiler::DocumentError;
use crate::config::SiteConfig;
use anyhow::{Context, Result};
use markdown::ParseOptions;
use markdown::mdast::Node;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Public API
// ============================================================================

/// Compile all documents in parallel and collect their metadata.
///
/// Drafts are compiled up to schema validation but produce no output.
/// Results are ordered by relative path so feed and sitemap generation
/// are reproducible.
pub fn compile_documents(
    files: &[PathBuf],
    config: &SiteConfig,
    dry_run: bool,
    on_progress: impl Fn() + Sync,
) -> Result<Pages> {
    let compiled = files
        .par_iter()
        .map(|path| {
            let mut diagnostics = Diagnostics::new();
            let result = compile_document(path, config, dry_run, &mut diagnostics);
            diagnostics.flush(path);
            on_progress();
            result.with_context(|| format!("failed to compile `{}`", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut items: Vec<PageMeta> = compiled.into_iter().flatten().collect();
    items.sort_by(|a, b| a.paths.relative.cmp(&b.paths.relative));

    Ok(Pages { items })
}

/// Compile a single document.
///
/// Returns `None` for drafts. With `dry_run` set, runs the full pipeline
/// (including the transform, so diagnostics are collected) but writes
/// nothing. The transform is invoked exactly once per document.
pub fn compile_document(
    path: &Path,
    config: &SiteConfig,
    dry_run: bool,
    diagnostics: &mut Diagnostics,
) -> Result<Option<PageMeta>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("cannot read `{}`", path.display()))?;

    let (yaml, body) = split_frontmatter(&source);
    let frontmatter = yaml.map(|y| Frontmatter::parse(y, path)).transpose()?;

    let page = PageMeta::from_source(path.to_path_buf(), frontmatter.as_ref(), config)?;

    let empty = Frontmatter::default();
    validate_frontmatter(
        &page.collection,
        frontmatter.as_ref().unwrap_or(&empty),
        path,
    )?;

    if page.is_draft() {
        return Ok(None);
    }

    // Unchanged source with existing output: keep the metadata, skip the
    // transform and the write.
    if !dry_run && !config.build.clean && is_up_to_date(path, &page.paths.output) {
        return Ok(Some(page));
    }

    let mut tree = parse_tree(body, path)?;
    let file = SourceFile::new(path.to_path_buf(), frontmatter);
    auto_import(&mut tree, &file, config, diagnostics)?;

    if !dry_run {
        let emitted = emit_document(&tree, body);
        if let Some(parent) = page.paths.output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&page.paths.output, emitted)
            .with_context(|| format!("cannot write `{}`", page.paths.output.display()))?;
    }

    Ok(Some(page))
}

// ============================================================================
// Frontmatter splitting
// ============================================================================

/// Split a leading YAML frontmatter block from the document body.
///
/// The block is delimited by `---` fences on their own lines, starting at
/// the very first line. Documents without a block return `(None, source)`.
pub fn split_frontmatter(source: &str) -> (Option<&str>, &str) {
    let Some(after_open) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }

    // Unterminated fence: treat the whole file as body.
    (None, source)
}

// ============================================================================
// Parse and emit
// ============================================================================

/// Parse a document body into an MDX syntax tree.
pub fn parse_tree(body: &str, path: &Path) -> Result<Node, DocumentError> {
    markdown::to_mdast(body, &ParseOptions::mdx()).map_err(|message| DocumentError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    })
}

/// Serialize a transformed tree back to MDX text.
///
/// The transform only prepends synthetic import nodes (recognizable by
/// their missing positional info), so emission is the rendered import
/// block followed by the original body.
pub fn emit_document(tree: &Node, body: &str) -> String {
    let imports: Vec<&str> = tree
        .children()
        .into_iter()
        .flatten()
        .map_while(|node| match node {
            Node::MdxjsEsm(esm) if esm.position.is_none() => Some(esm.value.as_str()),
            _ => None,
        })
        .collect();

    if imports.is_empty() {
        return body.to_owned();
    }

    let mut out = String::with_capacity(imports.iter().map(|i| i.len() + 1).sum::<usize>() + body.len() + 1);
    for import in imports {
        out.push_str(import);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(body);
    out
}

// ============================================================================
// Tests
// ============================================================================
