//! Frontmatter records, collection schemas, and page metadata.
//!
//! `PageMeta` is the primary metadata structure for content documents,
//! containing the path and URL information needed across the build
//! pipeline:
//!
//! ```text
//! compile_document()
//!     │
//!     ├── Frontmatter::parse()  ──► validate_frontmatter() (per collection)
//!     │
//!     └── PageMeta::from_source()
//!             │
//!             ▼
//!       Pages { items: Vec<PageMeta> }
//!             │
//!      ┌──────┴───────┐
//!      ▼              ▼
//!  build_rss()   build_sitemap()
//! ```
//!
//! Collection schemas mirror the site's content model: `blog` posts carry
//! a description and an optional publication date, `ctf-write-up` entries
//! carry a category and points, `book-review` entries carry a rating and a
//! read date. Data collections (`ctfs`, `unread-books`) are JSON arrays
//! validated during `emdex check`.

use crate::compiler::DocumentError;
use crate::compiler::imports::{document_slug, resolve_identity};
use crate::config::SiteConfig;
use crate::utils::date::{parse_datetime, to_ymd};
use crate::utils::decode::decode_file_stem;
use crate::utils::slug::slugify_path;
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

// ============================================================================
// Frontmatter
// ============================================================================

/// A document's frontmatter record: the raw key-value mapping parsed from
/// the YAML block at the top of the file.
///
/// Typed projections (`ContentMeta`, collection schemas) are deserialized
/// from the raw value on demand, so unknown author-defined keys survive.
#[derive(Debug, Clone, Default)]
pub struct Frontmatter {
    raw: serde_yaml::Value,
}

impl Frontmatter {
    /// Parse a YAML frontmatter block. The block must be a mapping.
    pub fn parse(yaml: &str, path: &Path) -> Result<Self, DocumentError> {
        let raw: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|source| DocumentError::Frontmatter {
                path: path.to_path_buf(),
                source,
            })?;

        if !raw.is_mapping() && !raw.is_null() {
            return Err(DocumentError::Schema {
                path: path.to_path_buf(),
                reason: "frontmatter must be a key-value mapping".into(),
            });
        }

        Ok(Self { raw })
    }

    /// The `url` override field, used verbatim as the asset directory and
    /// URL slug when present.
    pub fn url_override(&self) -> Option<&str> {
        self.raw.get("url").and_then(serde_yaml::Value::as_str)
    }

    /// Deserialize a typed projection of the record.
    ///
    /// An empty frontmatter block projects like an empty mapping.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
        let value = if self.raw.is_null() {
            serde_yaml::Value::Mapping(serde_yaml::Mapping::new())
        } else {
            self.raw.clone()
        };
        serde_yaml::from_value(value)
    }
}

// ============================================================================
// Common content metadata
// ============================================================================

/// Fields shared by all document collections. All optional; collection
/// schemas tighten the requirements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub author: Option<String>,
    pub draft: bool,
}

impl ContentMeta {
    /// Parsed publication date, if one is present and well-formed.
    pub fn pub_datetime(&self) -> Option<DateTime<Utc>> {
        self.pub_date.as_deref().and_then(parse_datetime)
    }
}

// ============================================================================
// Collection schemas
// ============================================================================

/// Closed category set for CTF write-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum WriteupCategory {
    #[serde(rename = "Web Exploitation")]
    WebExploitation,
    #[serde(rename = "Reverse Engineering")]
    ReverseEngineering,
    #[serde(rename = "Forensics")]
    Forensics,
    #[serde(rename = "General Skills")]
    GeneralSkills,
    #[serde(rename = "Binary Exploitation")]
    BinaryExploitation,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogMeta {
    #[allow(dead_code)]
    description: String,
    #[serde(default)]
    pub_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteupMeta {
    #[allow(dead_code)]
    description: String,
    #[allow(dead_code)]
    category: WriteupCategory,
    #[allow(dead_code)]
    points: u32,
    #[serde(default)]
    #[allow(dead_code)]
    attachments: Vec<String>,
    #[serde(default)]
    links: Vec<WriteupLink>,
}

#[derive(Debug, Deserialize)]
struct WriteupLink {
    #[allow(dead_code)]
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct BookReviewMeta {
    rating: f64,
    read: String,
}

/// Validate a document's frontmatter against its collection schema.
///
/// Collections without a declared schema accept any mapping.
pub fn validate_frontmatter(
    collection: &str,
    frontmatter: &Frontmatter,
    path: &Path,
) -> Result<(), DocumentError> {
    let schema_err = |reason: String| DocumentError::Schema {
        path: path.to_path_buf(),
        reason,
    };

    match collection {
        "blog" => {
            let meta: BlogMeta = frontmatter
                .typed()
                .map_err(|e| schema_err(e.to_string()))?;
            if let Some(date) = &meta.pub_date
                && parse_datetime(date).is_none()
            {
                return Err(schema_err(format!("unparsable pubDate `{date}`")));
            }
        }
        "ctf-write-up" => {
            let meta: WriteupMeta = frontmatter
                .typed()
                .map_err(|e| schema_err(e.to_string()))?;
            for link in &meta.links {
                validate_url(&link.url).map_err(|e| schema_err(e.to_string()))?;
            }
        }
        "book-review" => {
            let meta: BookReviewMeta = frontmatter
                .typed()
                .map_err(|e| schema_err(e.to_string()))?;
            if !(1.0..=5.0).contains(&meta.rating) || (meta.rating * 2.0).fract() != 0.0 {
                return Err(schema_err(format!(
                    "rating must be between 1 and 5 in steps of 0.5, got {}",
                    meta.rating
                )));
            }
            if parse_datetime(&meta.read).is_none() {
                return Err(schema_err(format!("unparsable read date `{}`", meta.read)));
            }
        }
        _ => {}
    }

    Ok(())
}

// ============================================================================
// Data collections
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CtfEntry {
    #[allow(dead_code)]
    ctf_name: String,
    ctf_link: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnreadBook {
    #[allow(dead_code)]
    title: String,
    #[allow(dead_code)]
    author: String,
    url: String,
    #[allow(dead_code)]
    in_progress: bool,
}

/// Validate a data-collection JSON document. Returns the entry count.
///
/// `ctfs` and `unread-books` have declared schemas; any other data file
/// must at least be an array of objects.
pub fn validate_data_collection(name: &str, json: &str) -> Result<usize> {
    match name {
        "ctfs" => {
            let entries: Vec<CtfEntry> = serde_json::from_str(json)?;
            for entry in &entries {
                validate_url(&entry.ctf_link)?;
            }
            Ok(entries.len())
        }
        "unread-books" => {
            let entries: Vec<UnreadBook> = serde_json::from_str(json)?;
            for entry in &entries {
                validate_url(&entry.url)?;
            }
            Ok(entries.len())
        }
        _ => {
            let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
            if let Some(bad) = entries.iter().find(|e| !e.is_object()) {
                return Err(anyhow!("data entries must be objects, got {bad}"));
            }
            Ok(entries.len())
        }
    }
}

fn validate_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("invalid url `{url}`"))
    }
}

// ============================================================================
// Page metadata
// ============================================================================

/// Path information for a compiled document.
#[derive(Debug, Clone)]
pub struct PagePaths {
    /// Source file path
    pub source: PathBuf,
    /// Output file path (in the output directory)
    pub output: PathBuf,
    /// Relative path (`collection/slug`, for logging)
    pub relative: String,
    /// URL path (`/collection/slug/`)
    pub url_path: String,
    /// Complete URL (base url + url path)
    pub full_url: String,
}

/// Metadata for one content document.
#[derive(Debug, Clone)]
pub struct PageMeta {
    /// Collection the document belongs to
    pub collection: String,
    /// Path information
    pub paths: PagePaths,
    /// Source file modification time (for sitemap `lastmod`)
    pub lastmod: Option<SystemTime>,
    /// Common frontmatter projection
    pub meta: ContentMeta,
}

impl PageMeta {
    /// Compute page metadata from a source path and its frontmatter.
    ///
    /// Collection and slug derivation go through the same resolver the
    /// auto-import transform uses, so page URLs and asset directories
    /// cannot drift apart.
    pub fn from_source(
        source: PathBuf,
        frontmatter: Option<&Frontmatter>,
        config: &SiteConfig,
    ) -> Result<Self, DocumentError> {
        let identity = resolve_identity(&source, frontmatter, config)?;
        let slug = document_slug(&source, frontmatter)?;

        let meta: ContentMeta = match frontmatter {
            Some(fm) => fm.typed().map_err(|source_err| DocumentError::Frontmatter {
                path: source.clone(),
                source: source_err,
            })?,
            None => ContentMeta::default(),
        };

        let relative = slugify_path(format!("{}/{slug}", identity.collection));
        let output = config.output_dir().join(&relative).join("index.mdx");
        let url_path = format!("{}/", config.paths().url_for_rel_path(&relative));
        let full_url = match &config.base.url {
            Some(url) => format!("{}{url_path}", url.trim_end_matches('/')),
            None => url_path.clone(),
        };

        let lastmod = fs::metadata(&source).and_then(|m| m.modified()).ok();

        Ok(Self {
            collection: identity.collection,
            paths: PagePaths {
                source,
                output,
                relative,
                url_path,
                full_url,
            },
            lastmod,
            meta,
        })
    }

    /// Last modification date as `YYYY-MM-DD`, if known.
    pub fn lastmod_ymd(&self) -> Option<String> {
        self.lastmod.map(to_ymd)
    }

    /// Title for feed items: explicit frontmatter title, else the decoded
    /// source file name.
    pub fn feed_title(&self) -> String {
        self.meta
            .title
            .clone()
            .or_else(|| decode_file_stem(&self.paths.source))
            .unwrap_or_else(|| self.paths.relative.clone())
    }

    pub fn is_draft(&self) -> bool {
        self.meta.draft
    }
}

/// All compiled pages, in collection order.
#[derive(Debug, Default)]
pub struct Pages {
    pub items: Vec<PageMeta>,
}

impl Pages {
    pub fn iter(&self) -> impl Iterator<Item = &PageMeta> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(yaml: &str) -> Frontmatter {
        Frontmatter::parse(yaml, Path::new("content/blog/test.mdx")).unwrap()
    }

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(Path::new(""));
        config.base.url = Some("https://example.com".to_string());
        config
    }

    // ------------------------------------------------------------------------
    // Frontmatter
    // ------------------------------------------------------------------------

    #[test]
    fn test_frontmatter_url_override() {
        let fm = fm("url: custom-slug\ndescription: x");
        assert_eq!(fm.url_override(), Some("custom-slug"));
    }

    #[test]
    fn test_frontmatter_without_url() {
        let fm = fm("description: x");
        assert_eq!(fm.url_override(), None);
    }

    #[test]
    fn test_frontmatter_rejects_non_mapping() {
        let result = Frontmatter::parse("- a\n- b", Path::new("test.mdx"));
        assert!(matches!(result, Err(DocumentError::Schema { .. })));
    }

    #[test]
    fn test_frontmatter_empty_is_ok() {
        let fm = Frontmatter::parse("", Path::new("test.mdx")).unwrap();
        assert_eq!(fm.url_override(), None);
    }

    #[test]
    fn test_content_meta_projection() {
        let meta: ContentMeta = fm("title: Hello\npubDate: 2024-01-01\nauthor: Arhan")
            .typed()
            .unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert!(meta.pub_datetime().is_some());
        assert_eq!(meta.author.as_deref(), Some("Arhan"));
        assert!(!meta.draft);
    }

    // ------------------------------------------------------------------------
    // Collection schemas
    // ------------------------------------------------------------------------

    #[test]
    fn test_blog_schema_requires_description() {
        let path = Path::new("content/blog/post.mdx");
        assert!(validate_frontmatter("blog", &fm("description: A post"), path).is_ok());
        assert!(validate_frontmatter("blog", &fm("title: no description"), path).is_err());
    }

    #[test]
    fn test_blog_schema_rejects_bad_pub_date() {
        let path = Path::new("content/blog/post.mdx");
        let result = validate_frontmatter(
            "blog",
            &fm("description: x\npubDate: someday"),
            path,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_writeup_schema() {
        let path = Path::new("content/ctf-write-up/chall.mdx");
        let valid = fm(concat!(
            "description: pwn\n",
            "category: Binary Exploitation\n",
            "points: 500\n",
            "links:\n",
            "  - name: challenge\n",
            "    url: https://ctf.example.com/chall\n",
        ));
        assert!(validate_frontmatter("ctf-write-up", &valid, path).is_ok());

        let bad_category = fm("description: x\ncategory: Cooking\npoints: 100");
        assert!(validate_frontmatter("ctf-write-up", &bad_category, path).is_err());

        let bad_link = fm(concat!(
            "description: x\n",
            "category: Forensics\n",
            "points: 100\n",
            "links:\n",
            "  - name: bad\n",
            "    url: not-a-url\n",
        ));
        assert!(validate_frontmatter("ctf-write-up", &bad_link, path).is_err());
    }

    #[test]
    fn test_book_review_schema() {
        let path = Path::new("content/book-review/book.mdx");
        assert!(
            validate_frontmatter("book-review", &fm("rating: 4.5\nread: 2024-03-01"), path)
                .is_ok()
        );
        // out of range
        assert!(
            validate_frontmatter("book-review", &fm("rating: 5.5\nread: 2024-03-01"), path)
                .is_err()
        );
        // not a multiple of 0.5
        assert!(
            validate_frontmatter("book-review", &fm("rating: 4.3\nread: 2024-03-01"), path)
                .is_err()
        );
        // unparsable read date
        assert!(
            validate_frontmatter("book-review", &fm("rating: 4.0\nread: last week"), path)
                .is_err()
        );
    }

    #[test]
    fn test_unschematized_collection_accepts_anything() {
        let path = Path::new("content/cubing-competition/comp.mdx");
        assert!(validate_frontmatter("cubing-competition", &fm("whatever: 42"), path).is_ok());
    }

    // ------------------------------------------------------------------------
    // Data collections
    // ------------------------------------------------------------------------

    #[test]
    fn test_ctfs_data_collection() {
        let json = r#"[{"ctfName": "picoCTF", "ctfLink": "https://picoctf.org"}]"#;
        assert_eq!(validate_data_collection("ctfs", json).unwrap(), 1);

        let bad = r#"[{"ctfName": "picoCTF", "ctfLink": "picoctf.org"}]"#;
        assert!(validate_data_collection("ctfs", bad).is_err());
    }

    #[test]
    fn test_unread_books_data_collection() {
        let json = r#"[{
            "title": "TAPL",
            "author": "Pierce",
            "url": "https://example.com/tapl",
            "inProgress": true
        }]"#;
        assert_eq!(validate_data_collection("unread-books", json).unwrap(), 1);
    }

    #[test]
    fn test_generic_data_collection_must_be_objects() {
        assert_eq!(validate_data_collection("misc", r#"[{"a": 1}]"#).unwrap(), 1);
        assert!(validate_data_collection("misc", r#"[1, 2]"#).is_err());
        assert!(validate_data_collection("misc", r#"{"a": 1}"#).is_err());
    }

    // ------------------------------------------------------------------------
    // PageMeta
    // ------------------------------------------------------------------------

    #[test]
    fn test_page_meta_from_source() {
        let config = test_config();
        let page = PageMeta::from_source(
            PathBuf::from("src/content/blog/My First Post.mdx"),
            None,
            &config,
        )
        .unwrap();

        assert_eq!(page.collection, "blog");
        assert_eq!(page.paths.relative, "blog/my-first-post");
        assert_eq!(page.paths.url_path, "/blog/my-first-post/");
        assert_eq!(page.paths.full_url, "https://example.com/blog/my-first-post/");
        assert_eq!(
            page.paths.output,
            PathBuf::from("dist/blog/my-first-post/index.mdx")
        );
    }

    #[test]
    fn test_page_meta_url_override() {
        let config = test_config();
        let frontmatter = fm("url: custom-slug");
        let page = PageMeta::from_source(
            PathBuf::from("src/content/blog/whatever.mdx"),
            Some(&frontmatter),
            &config,
        )
        .unwrap();

        assert_eq!(page.paths.relative, "blog/custom-slug");
    }

    #[test]
    fn test_page_meta_outside_content_root() {
        let config = test_config();
        let result = PageMeta::from_source(PathBuf::from("elsewhere/post.mdx"), None, &config);
        assert!(matches!(
            result,
            Err(DocumentError::OutsideContentRoot(_))
        ));
    }

    #[test]
    fn test_page_meta_missing_collection() {
        let config = test_config();
        let result =
            PageMeta::from_source(PathBuf::from("src/content/stray.mdx"), None, &config);
        assert!(matches!(result, Err(DocumentError::MissingCollection(_))));
    }

    #[test]
    fn test_feed_title_falls_back_to_decoded_name() {
        let config = test_config();
        let page = PageMeta::from_source(
            PathBuf::from("src/content/blog/Tips &amp; Tricks.mdx"),
            None,
            &config,
        )
        .unwrap();

        assert_eq!(page.feed_title(), "Tips & Tricks");
    }
}
