//! Python import statement parsing.

use super::ImportFact;
use tree_sitter::Node;

/// Parse an `import_statement`: one whole-module fact per imported module.
///
/// `import a.b as c` imports module `a.b`; the alias is not recorded.
pub fn parse_import_statement(node: Node<'_>, source: &[u8]) -> Vec<ImportFact> {
    let mut cursor = node.walk();
    node.children_by_field_name("name", &mut cursor)
        .filter_map(|child| imported_path(child, source))
        .map(ImportFact::module)
        .collect()
}

/// Parse an `import_from_statement`.
///
/// Yields one member fact per imported name (`*` for wildcard imports),
/// followed by one whole-module fact for the source module.
pub fn parse_import_from_statement(node: Node<'_>, source: &[u8]) -> Vec<ImportFact> {
    let Some(module) = node
        .child_by_field_name("module_name")
        .and_then(|m| m.utf8_text(source).ok())
        .map(str::to_string)
    else {
        return Vec::new();
    };

    let mut facts = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "wildcard_import" {
            facts.push(ImportFact::member(&module, "*"));
        }
    }

    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        if let Some(name) = imported_path(child, source) {
            facts.push(ImportFact::member(&module, name));
        }
    }

    facts.push(ImportFact::module(module));
    facts
}

/// Dotted path of a `dotted_name`, or of the name inside an `aliased_import`.
fn imported_path(node: Node<'_>, source: &[u8]) -> Option<String> {
    let path = match node.kind() {
        "aliased_import" => node.child_by_field_name("name")?,
        "dotted_name" => node,
        _ => return None,
    };
    path.utf8_text(source).ok().map(str::to_string)
}
