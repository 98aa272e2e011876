//! `[collections]` section configuration.
//!
//! Declares which collections are flat (shared asset directory) and the
//! list of helper-component imports injected into every compiled document.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[collections]` section in emdex.toml.
///
/// # Example
/// ```toml
/// [collections]
/// flat = ["book-review", "ctf-write-up"]
///
/// [[collections.imports]]
/// path = "/src/components/ContentImage.astro"
/// default = "ContentImage"
///
/// [[collections.imports]]
/// path = "/src/components/Figure.astro"
/// default = "Figure"
/// named = [{ name = "Caption" }, { name = "Credit", alias = "By" }]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CollectionsConfig {
    /// Collections whose assets live directly under the collection folder,
    /// shared across all documents in that collection.
    #[serde(default = "defaults::collections::flat")]
    #[educe(Default = defaults::collections::flat())]
    pub flat: Vec<String>,

    /// Imports injected into every compiled document, before the
    /// discovered asset imports.
    #[serde(default = "defaults::collections::imports")]
    #[educe(Default = defaults::collections::imports())]
    pub imports: Vec<ImportSpec>,
}

impl CollectionsConfig {
    /// Whether `collection` keeps its assets in one shared directory.
    pub fn is_flat(&self, collection: &str) -> bool {
        self.flat.iter().any(|c| c == collection)
    }
}

/// One import declaration injected into every document.
///
/// At least one of `default`/`named` should be set; an entry with neither
/// still renders as a bare `import "path";` side-effect import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportSpec {
    /// Module path as it should appear in the emitted import statement.
    pub path: String,

    /// Default import identifier.
    #[serde(default)]
    pub default: Option<String>,

    /// Named import specifiers.
    #[serde(default)]
    pub named: Vec<NamedImport>,
}

/// A named import specifier, optionally aliased (`{ name as alias }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedImport {
    pub name: String,

    #[serde(default)]
    pub alias: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_collections_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert!(config.collections.is_flat("ctf-write-up"));
        assert!(config.collections.is_flat("book-review"));
        assert!(config.collections.is_flat("cubing-competition"));
        assert!(!config.collections.is_flat("blog"));

        let imports = &config.collections.imports;
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].default.as_deref(), Some("ContentImage"));
        assert_eq!(imports[1].default.as_deref(), Some("ContentVideo"));
    }

    #[test]
    fn test_collections_custom_flat() {
        let config = r#"
            [collections]
            flat = ["gallery"]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert!(config.collections.is_flat("gallery"));
        assert!(!config.collections.is_flat("ctf-write-up"));
    }

    #[test]
    fn test_collections_custom_imports() {
        let config = r#"
            [[collections.imports]]
            path = "/src/components/Figure.astro"
            default = "Figure"
            named = [{ name = "Caption" }, { name = "Credit", alias = "By" }]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        let imports = &config.collections.imports;
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].path, "/src/components/Figure.astro");
        assert_eq!(imports[0].named.len(), 2);
        assert_eq!(imports[0].named[1].alias.as_deref(), Some("By"));
    }

    #[test]
    fn test_collections_empty_imports() {
        let config = r#"
            [collections]
            imports = []
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert!(config.collections.imports.is_empty());
    }
}
