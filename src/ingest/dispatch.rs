//! Language-aware entity extraction dispatcher.
//!
//! Each supported language provides a [`LanguageExtractor`]: a static table
//! from grammar node kind to handler. [`EntityIter`] walks a syntax tree
//! depth-first and runs the handler registered for each node kind it meets.
//! Node kinds without a handler are skipped together with their subtree.
//! Handlers decide what to emit and which child containers to walk next.

use crate::error::ParseFailure;
use crate::ingest::context::ExtractionContext;
use crate::ingest::detect::Language;
use crate::ingest::frontend::SyntaxFrontend;
use crate::ingest::{java::JavaExtractor, python::PythonExtractor};
use crate::symbol::{Entity, Point};
use std::collections::VecDeque;
use std::path::Path;
use tree_sitter::Node;

/// Handler run for one node of a registered kind.
pub type NodeHandler = for<'t> fn(Node<'t>, &Scope<'_>, &mut ExtractionContext, &mut Visit<'t>);

/// Per-language extraction capability.
pub trait LanguageExtractor: Sync {
    /// Language this extractor handles.
    fn language(&self) -> Language;

    /// Node kind → handler table.
    fn handlers(&self) -> &'static [(&'static str, NodeHandler)];

    /// Handler registered for `kind`, if any.
    fn handler(&self, kind: &str) -> Option<NodeHandler> {
        self.handlers()
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, handler)| *handler)
    }
}

/// Pick the extractor for `language`.
pub fn extractor_for(language: Language) -> &'static dyn LanguageExtractor {
    match language {
        Language::Java => &JavaExtractor,
        Language::Python => &PythonExtractor,
    }
}

/// Read-only state visible to a handler.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'s> {
    /// Source bytes of the whole file.
    pub source: &'s [u8],
    /// Name of the innermost enclosing type declaration.
    pub owner: Option<&'s str>,
}

/// What a handler produced for one node.
#[derive(Debug, Default)]
pub struct Visit<'t> {
    entities: Vec<Entity>,
    containers: Vec<(Node<'t>, Option<String>)>,
}

impl<'t> Visit<'t> {
    /// Yield `entity`.
    pub fn emit(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Walk the named children of `node` after this node's entities.
    ///
    /// `owner` becomes the enclosing type name seen by those children.
    pub fn descend(&mut self, node: Node<'t>, owner: Option<String>) {
        self.containers.push((node, owner));
    }
}

struct Frame<'t> {
    node: Node<'t>,
    owner: Option<String>,
}

/// Lazy, depth-first stream of entities from one syntax tree.
///
/// Finite and not restartable. Every entity is claimed in the borrowed
/// [`ExtractionContext`], so a declaration reachable twice is yielded once.
pub struct EntityIter<'t, 'c> {
    extractor: &'static dyn LanguageExtractor,
    source: &'t [u8],
    ctx: &'c mut ExtractionContext,
    stack: Vec<Frame<'t>>,
    pending: VecDeque<Entity>,
}

impl<'t, 'c> EntityIter<'t, 'c> {
    fn push_children(&mut self, node: Node<'t>, owner: Option<String>) {
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            self.stack.push(Frame {
                node: child,
                owner: owner.clone(),
            });
        }
    }
}

impl Iterator for EntityIter<'_, '_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        loop {
            if let Some(entity) = self.pending.pop_front() {
                return Some(entity);
            }

            let frame = self.stack.pop()?;
            let Some(handler) = self.extractor.handler(frame.node.kind()) else {
                continue;
            };

            let scope = Scope {
                source: self.source,
                owner: frame.owner.as_deref(),
            };
            let mut visit = Visit::default();
            handler(frame.node, &scope, &mut *self.ctx, &mut visit);

            self.pending.extend(visit.entities);
            for (container, owner) in visit.containers.into_iter().rev() {
                self.push_children(container, owner);
            }
        }
    }
}

/// Start a lazy extraction over `root`.
///
/// If `root` itself has a handler it is the first node visited; otherwise
/// its named children are.
pub fn extract_entities<'t, 'c>(
    extractor: &'static dyn LanguageExtractor,
    root: Node<'t>,
    source: &'t [u8],
    ctx: &'c mut ExtractionContext,
) -> EntityIter<'t, 'c> {
    let mut iter = EntityIter {
        extractor,
        source,
        ctx,
        stack: Vec::new(),
        pending: VecDeque::new(),
    };
    if extractor.handler(root.kind()).is_some() {
        iter.stack.push(Frame { node: root, owner: None });
    } else {
        iter.push_children(root, None);
    }
    iter
}

/// Parse `source` as the contents of `path` and extract every entity.
///
/// The language is detected from `path`'s extension.
///
/// # Example
///
/// ```
/// use repograph::ingest::dispatch::extract_file_entities;
/// use std::path::Path;
///
/// let entities = extract_file_entities(Path::new("/repo/A.java"), "class A {}\n")?;
/// assert_eq!(entities[0].name(), "A");
/// # Ok::<(), repograph::ParseFailure>(())
/// ```
pub fn extract_file_entities(path: &Path, source: &str) -> Result<Vec<Entity>, ParseFailure> {
    let mut frontend = SyntaxFrontend::new();
    let parsed = frontend.parse_source(path, source)?;
    let mut ctx = ExtractionContext::new(path.to_string_lossy());
    let extractor = extractor_for(parsed.language);
    Ok(extract_entities(extractor, parsed.root(), parsed.bytes(), &mut ctx).collect())
}

/// Text of `node`, if it is valid UTF-8.
pub fn text_of(node: Node<'_>, source: &[u8]) -> Option<String> {
    node.utf8_text(source).ok().map(str::to_string)
}

/// Text of the child in field `field`.
pub fn field_text(node: Node<'_>, field: &str, source: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| text_of(child, source))
}

/// Location and exact text of a node.
#[derive(Debug, Clone)]
pub struct Located {
    /// Start position.
    pub start_point: Point,
    /// End position.
    pub end_point: Point,
    /// Exact text of the span.
    pub source_code: String,
}

impl Located {
    /// Locate `node` in `source`.
    pub fn of(node: Node<'_>, source: &[u8]) -> Option<Self> {
        Some(Self {
            start_point: node.start_position().into(),
            end_point: node.end_position().into(),
            source_code: text_of(node, source)?,
        })
    }

    /// Start row, used for dedup keys.
    pub fn line(&self) -> usize {
        self.start_point.row
    }
}

/// Doc comment attached to `node`.
///
/// Only the immediately preceding named sibling is considered. It must be a
/// block comment starting with `marker` and end on the line directly above
/// `node` (or on the same line).
pub fn preceding_doc_comment(node: Node<'_>, source: &[u8], marker: &str) -> Option<String> {
    let sibling = node.prev_named_sibling()?;
    if sibling.kind() != "block_comment" {
        return None;
    }
    if sibling.end_position().row + 1 < node.start_position().row {
        return None;
    }
    let text = sibling.utf8_text(source).ok()?;
    text.starts_with(marker).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::EntityKind;

    #[test]
    fn test_extractor_for_language() {
        assert_eq!(extractor_for(Language::Java).language(), Language::Java);
        assert_eq!(extractor_for(Language::Python).language(), Language::Python);
    }

    #[test]
    fn test_unregistered_kind_has_no_handler() {
        let java = extractor_for(Language::Java);
        assert!(java.handler("class_declaration").is_some());
        assert!(java.handler("program").is_none());
        assert!(java.handler("expression_statement").is_none());
    }

    #[test]
    fn test_extract_java_file() {
        let source = "class Main { public static void main(String[] args) {} }\n";
        let entities = extract_file_entities(Path::new("/repo/Main.java"), source).unwrap();
        let kinds: Vec<_> = entities.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![EntityKind::Class, EntityKind::Method]);
        assert_eq!(entities[0].name(), "Main");
        assert_eq!(entities[1].name(), "main");
        assert!(entities.iter().all(|e| e.file_path() == "/repo/Main.java"));
    }

    #[test]
    fn test_extract_python_file() {
        let source = "def main():\n    pass\ndef foo():\n    pass\n";
        let entities = extract_file_entities(Path::new("/repo/test.py"), source).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].name(), "main");
        assert_eq!(entities[0].kind(), EntityKind::Function);
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let result = extract_file_entities(Path::new("test.unknown"), "fn main() {}\n");
        assert!(matches!(result, Err(ParseFailure::Unsupported { .. })));
    }

    #[test]
    fn test_iteration_is_lazy() {
        let source = "class A {}\nclass B {}\nclass C {}\n";
        let mut frontend = SyntaxFrontend::new();
        let parsed = frontend.parse_source(Path::new("/r/A.java"), source).unwrap();
        let mut ctx = ExtractionContext::new("/r/A.java");
        let extractor = extractor_for(Language::Java);

        let first = extract_entities(extractor, parsed.root(), parsed.bytes(), &mut ctx).next();
        assert_eq!(first.map(|e| e.name().to_string()), Some("A".to_string()));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_shared_context_suppresses_revisits() {
        let source = "class A { int x; }\n";
        let mut frontend = SyntaxFrontend::new();
        let parsed = frontend.parse_source(Path::new("/r/A.java"), source).unwrap();
        let mut ctx = ExtractionContext::new("/r/A.java");
        let extractor = extractor_for(Language::Java);

        let first: Vec<_> =
            extract_entities(extractor, parsed.root(), parsed.bytes(), &mut ctx).collect();
        let again: Vec<_> =
            extract_entities(extractor, parsed.root(), parsed.bytes(), &mut ctx).collect();
        assert_eq!(first.len(), 2);
        assert!(again.is_empty());
    }

    #[test]
    fn test_subtree_root_with_handler_is_visited() {
        let source = "class Outer { class Inner { void run() {} } }\n";
        let mut frontend = SyntaxFrontend::new();
        let parsed = frontend.parse_source(Path::new("/r/O.java"), source).unwrap();
        let class = parsed.root().named_child(0).unwrap();
        let mut ctx = ExtractionContext::new("/r/O.java");

        let names: Vec<_> =
            extract_entities(extractor_for(Language::Java), class, parsed.bytes(), &mut ctx)
                .map(|e| e.name().to_string())
                .collect();
        assert_eq!(names, vec!["Outer", "Inner", "run"]);
    }
}
