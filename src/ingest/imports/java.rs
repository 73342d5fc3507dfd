//! Java import declaration parsing.
//!
//! `import a.b.C;` → `C` from `a.b`. Static imports split the same way.
//! Wildcards keep the literal name `*` with the prefix as module. A bare
//! `import C;` comes from the `default` package.

use super::ImportFact;
use tree_sitter::Node;

/// Module reported for imports from the unnamed package.
pub const DEFAULT_PACKAGE: &str = "default";

/// Parse one `import_declaration` node.
///
/// Returns `None` if the declaration has no path.
pub fn parse_import_declaration(node: Node<'_>, source: &[u8]) -> Option<ImportFact> {
    let mut is_glob = false;
    let mut path = Vec::new();

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "scoped_identifier" | "identifier" => extract_path_segments(child, source, &mut path),
            "asterisk" => is_glob = true,
            _ => {}
        }
    }

    if path.is_empty() {
        return None;
    }

    let name = if is_glob {
        "*".to_string()
    } else {
        path.pop()?
    };
    let module = if path.is_empty() {
        DEFAULT_PACKAGE.to_string()
    } else {
        path.join(".")
    };

    Some(ImportFact::member(module, name))
}

/// Extract path segments from a scoped_identifier or identifier.
fn extract_path_segments(node: Node<'_>, source: &[u8], path: &mut Vec<String>) {
    match node.kind() {
        "identifier" => {
            if let Ok(name) = node.utf8_text(source) {
                path.push(name.to_string());
            }
        }
        "scoped_identifier" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if matches!(child.kind(), "identifier" | "scoped_identifier") {
                    extract_path_segments(child, source, path);
                }
            }
        }
        _ => {}
    }
}
