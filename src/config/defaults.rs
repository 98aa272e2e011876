//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [base] Section Defaults
// ============================================================================

pub mod base {
    pub fn url() -> Option<String> {
        None
    }

    pub fn author() -> String {
        "<YOUR_NAME>".into()
    }

    pub fn email() -> String {
        "user@noreply.emdex".into()
    }

    pub fn language() -> String {
        "en-US".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn path_prefix() -> PathBuf {
        "".into()
    }

    pub fn content() -> PathBuf {
        "src/content".into()
    }

    pub fn assets() -> PathBuf {
        "src/assets".into()
    }

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub mod rss {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "rss.xml".into()
        }
    }

    pub mod sitemap {
        use std::path::PathBuf;

        pub fn path() -> PathBuf {
            "sitemap.xml".into()
        }
    }
}

// ============================================================================
// [collections] Section Defaults
// ============================================================================

pub mod collections {
    use crate::config::ImportSpec;

    /// Collections whose assets live in one shared directory rather than
    /// one subdirectory per document.
    pub fn flat() -> Vec<String> {
        vec![
            "cubing-competition".into(),
            "book-review".into(),
            "ctf-write-up".into(),
        ]
    }

    /// Helper components injected into every compiled document.
    pub fn imports() -> Vec<ImportSpec> {
        vec![
            ImportSpec {
                path: "/src/components/ContentImage.astro".into(),
                default: Some("ContentImage".into()),
                named: Vec::new(),
            },
            ImportSpec {
                path: "/src/components/ContentVideo.astro".into(),
                default: Some("ContentVideo".into()),
                named: Vec::new(),
            },
        ]
    }
}
