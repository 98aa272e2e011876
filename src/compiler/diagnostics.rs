//! Structured diagnostics for the auto-import transform.
//!
//! The transform recovers locally from per-asset anomalies (an entry whose
//! identifier cannot be derived, or two entries competing for the same
//! identifier). Those recoveries are recorded here instead of being printed
//! directly, so the build can drain them to the log in one place and tests
//! can assert on them without capturing process output.

use crate::log;
use std::fmt;
use std::path::{Path, PathBuf};

/// A non-fatal warning emitted while transforming one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// An asset whose derived identifier came out empty.
    UnnamableAsset { asset: PathBuf },

    /// Two assets derived the same identifier; the first one wins.
    DuplicateIdentifier {
        name: String,
        kept: PathBuf,
        skipped: PathBuf,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnnamableAsset { asset } => {
                write!(f, "{}: failed to derive a name, skipping file", asset.display())
            }
            Self::DuplicateIdentifier {
                name,
                kept,
                skipped,
            } => {
                write!(
                    f,
                    "skipping import of {}: `{}` already imported with name {name}",
                    skipped.display(),
                    kept.display(),
                )
            }
        }
    }
}

/// Warning sink scoped to one document's transform invocation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// All warnings recorded so far, in emission order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Drain all warnings to the build log, prefixed with the document
    /// they belong to.
    pub fn flush(&mut self, document: &Path) {
        for warning in self.warnings.drain(..) {
            log!("import"; "{}: {warning}", document.display());
        }
    }
}
