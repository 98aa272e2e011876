//! Import statement rendering for the document tree.
//!
//! The transform injects imports as `MdxjsEsm` nodes whose `value` carries
//! the rendered ESM statement; the downstream bundler parses the statement
//! text. Rendering lives here so both the asset imports and the configured
//! component imports produce identical statement shapes.

use crate::config::ImportSpec;
use markdown::mdast::{MdxjsEsm, Node};
use std::path::Path;

/// Render an import specification as one ESM statement.
///
/// Shapes:
/// - default only: `import Name from "path";`
/// - named only: `import { a, b as c } from "path";`
/// - both: `import Name, { a } from "path";`
/// - neither: `import "path";` (side-effect import)
pub fn render_import(spec: &ImportSpec) -> String {
    let path = quote(&spec.path);

    let named = (!spec.named.is_empty()).then(|| {
        let specifiers = spec
            .named
            .iter()
            .map(|n| match &n.alias {
                Some(alias) => format!("{} as {}", n.name, alias),
                None => n.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{ {specifiers} }}")
    });

    match (&spec.default, named) {
        (Some(default), Some(named)) => format!("import {default}, {named} from {path};"),
        (Some(default), None) => format!("import {default} from {path};"),
        (None, Some(named)) => format!("import {named} from {path};"),
        (None, None) => format!("import {path};"),
    }
}

/// Build an import node for a discovered asset: identifier ← asset path.
pub fn default_import(name: &str, path: &Path) -> Node {
    esm_node(format!(
        "import {name} from {};",
        quote(&path.to_string_lossy())
    ))
}

/// Build an import node from a configured import specification.
pub fn import_node(spec: &ImportSpec) -> Node {
    esm_node(render_import(spec))
}

/// Wrap rendered ESM statement text in a synthetic tree node.
///
/// Synthetic nodes carry no positional info, which is how the emitter
/// tells them apart from nodes parsed out of the source.
fn esm_node(value: String) -> Node {
    Node::MdxjsEsm(MdxjsEsm {
        value,
        position: None,
        stops: Vec::new(),
    })
}

/// JS string literal quoting (JSON string escapes are a subset of JS).
fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
