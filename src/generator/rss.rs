//! rss feed generation.
//!
//! Builds the feed from compiled blog-collection metadata: only documents
//! carrying a publication date are included.

use crate::compiler::meta::{PageMeta, Pages};
use crate::config::SiteConfig;
use crate::log;
use crate::utils::date::to_rfc2822;
use anyhow::{Result, anyhow};
use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::{fs, sync::LazyLock};

/// Collection whose documents feed the rss channel.
const FEED_COLLECTION: &str = "blog";

// ============================================================================
// Public API
// ============================================================================

/// Build rss feed if enabled in config.
pub fn build_rss(config: &SiteConfig, pages: &Pages) -> Result<()> {
    if config.build.rss.enable {
        RssFeed::build(config, pages).write(config)?;
    }
    Ok(())
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

/// rss feed builder
struct RssFeed<'a> {
    config: &'a SiteConfig,
    pages: Vec<&'a PageMeta>,
}

impl<'a> RssFeed<'a> {
    /// Collect the published blog pages, in compile order.
    ///
    /// Pages without a parsable publication date are silently skipped.
    fn build(config: &'a SiteConfig, pages: &'a Pages) -> Self {
        let pages: Vec<_> = pages
            .iter()
            .filter(|p| p.collection == FEED_COLLECTION && p.meta.pub_datetime().is_some())
            .collect();

        Self { config, pages }
    }

    /// Generate rss xml string
    fn into_xml(self) -> Result<String> {
        let items: Vec<_> = self
            .pages
            .iter()
            .filter_map(|page| page_to_rss_item(page, self.config))
            .collect();

        let channel = ChannelBuilder::default()
            .title(&self.config.base.title)
            .link(self.config.base.url.as_deref().unwrap_or_default())
            .description(&self.config.base.description)
            .language(self.config.base.language.clone())
            .generator("emdex".to_string())
            .items(items)
            .build();

        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }

    /// Write rss feed to file
    fn write(self, config: &SiteConfig) -> Result<()> {
        let xml = self.into_xml()?;
        let rss_path = config.output_dir().join(&config.build.rss.path);

        if let Some(parent) = rss_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&rss_path, xml)?;

        log!("rss"; "{}", rss_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert `PageMeta` to rss item.
/// Returns None if the publication date is missing or unparsable.
fn page_to_rss_item(page: &PageMeta, config: &SiteConfig) -> Option<rss::Item> {
    let pub_date = page.meta.pub_datetime().map(to_rfc2822)?;
    let link = page.paths.full_url.clone();
    let author = normalize_rss_author(page.meta.author.as_ref(), config);

    Some(
        ItemBuilder::default()
            .title(page.feed_title())
            .link(Some(link.clone()))
            .guid(GuidBuilder::default().permalink(true).value(link).build())
            .description(page.meta.description.clone())
            .pub_date(pub_date)
            .author(author)
            .build(),
    )
}

/// Normalize author field to rss format: "email@example.com (Name)"
///
/// Priority:
/// 1. The given author if already in valid format
/// 2. Site config author if in valid format
/// 3. Combine site config email and author
fn normalize_rss_author(author: Option<&String>, config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let author = author?;

    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.clone());
    }

    let site_author = &config.base.author;
    if RE_VALID_AUTHOR.is_match(site_author) {
        return Some(site_author.clone());
    }

    Some(format!("{} ({})", config.base.email, site_author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::meta::{ContentMeta, PagePaths};
    use std::path::PathBuf;

    fn make_config(author: &str, email: &str) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.author = author.to_string();
        config.base.email = email.to_string();
        config.base.url = Some("https://example.com".to_string());
        config
    }

    fn make_page(collection: &str, date: Option<&str>, description: Option<&str>) -> PageMeta {
        PageMeta {
            collection: collection.to_string(),
            paths: PagePaths {
                source: PathBuf::from("src/content/blog/test.mdx"),
                output: PathBuf::from("dist/blog/test/index.mdx"),
                relative: "blog/test".to_string(),
                url_path: "/blog/test/".to_string(),
                full_url: "https://example.com/blog/test/".to_string(),
            },
            lastmod: None,
            meta: ContentMeta {
                title: Some("Test Title".to_string()),
                description: description.map(String::from),
                pub_date: date.map(String::from),
                author: None,
                draft: false,
            },
        }
    }

    #[test]
    fn test_normalize_rss_author() {
        let config = make_config("Site Author", "site@example.com");

        // already valid
        let valid = "post@example.com (Post Author)".to_string();
        assert_eq!(
            normalize_rss_author(Some(&valid), &config),
            Some(valid.clone())
        );

        // invalid: fall back to combined site email and author
        let invalid = "Post Author".to_string();
        assert_eq!(
            normalize_rss_author(Some(&invalid), &config),
            Some("site@example.com (Site Author)".to_string())
        );

        // no author at all
        assert_eq!(normalize_rss_author(None, &config), None);
    }

    #[test]
    fn test_page_to_rss_item() {
        let config = make_config("Site Author", "site@example.com");
        let page = make_page("blog", Some("2024-01-01"), Some("Test Summary"));

        let item = page_to_rss_item(&page, &config).expect("should convert to rss item");
        assert_eq!(item.title(), Some("Test Title"));
        assert_eq!(item.link(), Some("https://example.com/blog/test/"));
        assert_eq!(item.description(), Some("Test Summary"));
        assert!(item.pub_date().unwrap().contains("Jan 2024"));
    }

    #[test]
    fn test_page_to_rss_item_without_date() {
        let config = make_config("Site Author", "site@example.com");
        let page = make_page("blog", None, Some("x"));

        assert!(page_to_rss_item(&page, &config).is_none());
    }

    #[test]
    fn test_feed_filters_to_dated_blog_pages() {
        let config = make_config("Site Author", "site@example.com");
        let pages = Pages {
            items: vec![
                make_page("blog", Some("2024-01-01"), Some("in")),
                make_page("blog", None, Some("undated")),
                make_page("ctf-write-up", Some("2024-01-01"), Some("other collection")),
            ],
        };

        let feed = RssFeed::build(&config, &pages);
        assert_eq!(feed.pages.len(), 1);
        assert_eq!(
            feed.pages[0].meta.description.as_deref(),
            Some("in")
        );
    }

    #[test]
    fn test_feed_xml_contains_items() {
        let config = make_config("Site Author", "site@example.com");
        let pages = Pages {
            items: vec![make_page("blog", Some("2024-01-01"), Some("A post"))],
        };

        let xml = RssFeed::build(&config, &pages).into_xml().unwrap();
        assert!(xml.contains("<title>Test Title</title>"));
        assert!(xml.contains("https://example.com/blog/test/"));
        assert!(xml.contains("<description>A post</description>"));
    }
}
